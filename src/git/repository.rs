use crate::error::{CommitBumpError, Result};
use crate::git::{CommitAuthor, CommitInfo};
use git2::{Cred, CredentialType, PushOptions, RemoteCallbacks, Repository as Git2Repo, Signature};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Environment variables checked for an HTTPS push token, in order
const TOKEN_ENV_VARS: [&str; 2] = ["GITHUB_TOKEN", "GH_TOKEN"];

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Git2Repo,
}

impl Git2Repository {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;

        Ok(Git2Repository { repo })
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository { repo }
    }

    fn workdir(&self) -> Result<&Path> {
        self.repo
            .workdir()
            .ok_or_else(|| git2::Error::from_str("repository has no working directory").into())
    }

    /// Path of `path` relative to the working directory, as the index expects it
    fn index_path(&self, path: &Path) -> Result<PathBuf> {
        let root = self.workdir()?.canonicalize()?;
        let absolute = path.canonicalize()?;

        absolute
            .strip_prefix(&root)
            .map(Path::to_path_buf)
            .map_err(|_| {
                CommitBumpError::config(format!(
                    "{} is outside the repository at {}",
                    path.display(),
                    root.display()
                ))
            })
    }
}

/// Credential kinds already offered to the remote during one push.
///
/// libgit2 calls the credentials callback again after each rejection, so every
/// kind is offered at most once and the push fails once all are used up.
#[derive(Debug)]
struct CredentialAttempts {
    tried: CredentialType,
}

impl CredentialAttempts {
    fn new() -> Self {
        CredentialAttempts {
            tried: CredentialType::empty(),
        }
    }

    /// Next kind to offer: a CI token, then SSH keys and agent, then libgit2 defaults.
    fn next(&mut self, allowed: CredentialType) -> Option<CredentialType> {
        let candidates = [
            CredentialType::USER_PASS_PLAINTEXT,
            CredentialType::SSH_KEY,
            CredentialType::DEFAULT,
        ];
        let kind = candidates.into_iter().find(|&kind| {
            (kind == CredentialType::DEFAULT || allowed.contains(kind)) && !self.tried.contains(kind)
        })?;
        self.tried.insert(kind);
        Some(kind)
    }
}

fn token_credential() -> Option<std::result::Result<Cred, git2::Error>> {
    TOKEN_ENV_VARS
        .iter()
        .find_map(|var| std::env::var(var).ok().filter(|t| !t.is_empty()))
        .map(|token| Cred::userpass_plaintext("x-access-token", &token))
}

fn ssh_credential(user: &str) -> Option<Cred> {
    if let Some(home) = dirs::home_dir() {
        for key in ["id_ed25519", "id_rsa", "id_ecdsa"] {
            let path = home.join(".ssh").join(key);
            if path.exists() {
                if let Ok(cred) = Cred::ssh_key(user, None, &path, None) {
                    return Some(cred);
                }
            }
        }
    }

    Cred::ssh_key_from_agent(user).ok()
}

/// Credential callback for pushes.
///
/// Tries, in order: a CI token over HTTPS, SSH keys from `~/.ssh/`, the SSH
/// agent, then libgit2 defaults. Each is offered once.
fn push_callbacks<'a>() -> RemoteCallbacks<'a> {
    let mut callbacks = RemoteCallbacks::new();
    let mut attempts = CredentialAttempts::new();

    callbacks.credentials(move |_url, username_from_url, allowed_types| {
        while let Some(kind) = attempts.next(allowed_types) {
            if kind == CredentialType::USER_PASS_PLAINTEXT {
                if let Some(cred) = token_credential() {
                    return cred;
                }
            } else if kind == CredentialType::SSH_KEY {
                if let Some(cred) = ssh_credential(username_from_url.unwrap_or("git")) {
                    return Ok(cred);
                }
            } else {
                debug!("falling back to default credentials");
                return Cred::default();
            }
        }

        Err(git2::Error::from_str(
            "authentication failed: every available credential was rejected",
        ))
    });

    callbacks.push_update_reference(|refname, status| match status {
        Some(reason) => Err(git2::Error::from_str(&format!(
            "remote rejected {}: {}",
            refname, reason
        ))),
        None => Ok(()),
    });

    callbacks
}

impl super::Repository for Git2Repository {
    fn head_commit(&self) -> Result<CommitInfo> {
        let commit = self.repo.head()?.peel_to_commit()?;
        let author = commit.author().name().unwrap_or("unknown").to_string();

        Ok(CommitInfo {
            hash: commit.id().to_string(),
            message: String::from_utf8_lossy(commit.message_bytes()).into_owned(),
            author,
        })
    }

    fn current_branch(&self) -> Result<String> {
        let head = self.repo.head()?;
        if !head.is_branch() {
            return Err(git2::Error::from_str("HEAD is detached; no branch to push").into());
        }

        head.shorthand()
            .map(str::to_string)
            .ok_or_else(|| git2::Error::from_str("branch name is not valid UTF-8").into())
    }

    fn commit_file(&self, path: &Path, message: &str, author: &CommitAuthor) -> Result<String> {
        let relative = self.index_path(path)?;
        debug!(path = %relative.display(), "staging manifest");

        let mut index = self.repo.index()?;
        index.add_path(&relative)?;
        index.write()?;

        let tree = self.repo.find_tree(index.write_tree()?)?;
        let parent = self.repo.head()?.peel_to_commit()?;
        let signature = Signature::now(&author.name, &author.email)?;

        let oid = self.repo.commit(
            Some("HEAD"),
            &signature,
            &signature,
            message,
            &tree,
            &[&parent],
        )?;

        info!(commit = %oid, "created bump commit");
        Ok(oid.to_string())
    }

    fn push_branch(&self, remote: &str, branch: &str) -> Result<()> {
        let mut remote_handle = self
            .repo
            .find_remote(remote)
            .map_err(|e| CommitBumpError::remote(format!("Cannot find remote '{}': {}", remote, e)))?;

        let mut options = PushOptions::new();
        options.remote_callbacks(push_callbacks());

        let refspec = format!("refs/heads/{}:refs/heads/{}", branch, branch);
        remote_handle
            .push(&[refspec.as_str()], Some(&mut options))
            .map_err(|e| CommitBumpError::remote(format!("Push to '{}' failed: {}", remote, e)))?;

        info!(remote, branch, "pushed bump commit");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::Repository;
    use std::fs;

    fn init_repo(dir: &Path) -> Git2Repository {
        let repo = Git2Repo::init(dir).unwrap();
        fs::write(dir.join("pubspec.yaml"), "name: demo\nversion: 1.0.0+1\n").unwrap();
        {
            let mut index = repo.index().unwrap();
            index.add_path(Path::new("pubspec.yaml")).unwrap();
            index.write().unwrap();
            let tree = repo.find_tree(index.write_tree().unwrap()).unwrap();
            let sig = Signature::now("Dev", "dev@example.com").unwrap();
            repo.commit(Some("HEAD"), &sig, &sig, "fix: resolve crash", &tree, &[])
                .unwrap();
        }
        Git2Repository::from_git2(repo)
    }

    #[test]
    fn test_head_commit_message() {
        let dir = tempfile::tempdir().unwrap();
        let repo = init_repo(dir.path());

        let head = repo.head_commit().unwrap();
        assert_eq!(head.message, "fix: resolve crash");
        assert_eq!(head.author, "Dev");
        assert_eq!(head.hash.len(), 40);
    }

    #[test]
    fn test_current_branch() {
        let dir = tempfile::tempdir().unwrap();
        let repo = init_repo(dir.path());

        let branch = repo.current_branch().unwrap();
        assert!(!branch.is_empty());
    }

    #[test]
    fn test_commit_file() {
        let dir = tempfile::tempdir().unwrap();
        let repo = init_repo(dir.path());
        let manifest = dir.path().join("pubspec.yaml");
        fs::write(&manifest, "name: demo\nversion: 1.0.1+2\n").unwrap();

        let author = CommitAuthor::new("bot", "bot@example.com");
        let hash = repo
            .commit_file(&manifest, "chore: bump version to 1.0.1+2 [skip ci]", &author)
            .unwrap();

        let head = repo.head_commit().unwrap();
        assert_eq!(head.hash, hash);
        assert_eq!(head.message, "chore: bump version to 1.0.1+2 [skip ci]");
        assert_eq!(head.author, "bot");
    }

    #[test]
    fn test_commit_file_outside_repository() {
        let dir = tempfile::tempdir().unwrap();
        let other = tempfile::tempdir().unwrap();
        let repo = init_repo(dir.path());
        let stray = other.path().join("pubspec.yaml");
        fs::write(&stray, "version: 1.0.0+1\n").unwrap();

        let author = CommitAuthor::new("bot", "bot@example.com");
        let result = repo.commit_file(&stray, "msg [skip ci]", &author);
        assert!(matches!(result, Err(CommitBumpError::Config(_))));
    }

    #[test]
    fn test_credential_attempts_offer_each_kind_once() {
        let allowed = CredentialType::USER_PASS_PLAINTEXT | CredentialType::SSH_KEY;
        let mut attempts = CredentialAttempts::new();

        assert_eq!(attempts.next(allowed), Some(CredentialType::USER_PASS_PLAINTEXT));
        assert_eq!(attempts.next(allowed), Some(CredentialType::SSH_KEY));
        assert_eq!(attempts.next(allowed), Some(CredentialType::DEFAULT));
        assert_eq!(attempts.next(allowed), None);
        assert_eq!(attempts.next(allowed), None);
    }

    #[test]
    fn test_credential_attempts_skip_disallowed_kinds() {
        let mut attempts = CredentialAttempts::new();

        assert_eq!(attempts.next(CredentialType::SSH_KEY), Some(CredentialType::SSH_KEY));
        assert_eq!(attempts.next(CredentialType::SSH_KEY), Some(CredentialType::DEFAULT));
        assert_eq!(attempts.next(CredentialType::SSH_KEY), None);
    }

    #[test]
    fn test_push_to_missing_remote() {
        let dir = tempfile::tempdir().unwrap();
        let repo = init_repo(dir.path());

        let err = repo.push_branch("origin", "main").unwrap_err();
        assert!(err.to_string().contains("Cannot find remote"));
    }
}
