//! `checkout-synced`: pin nested working copies to the synced commits.
//!
//! Consumes the `prs-shas` listing, walks a directory tree and detaches every
//! git checkout whose `origin` names a listed repository at the listed SHA.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use glob::Pattern;

use crate::domain::{AppError, RepoName};
use crate::ports::GitCheckout;

#[derive(Debug, Clone)]
pub struct CheckoutOptions {
    pub root: PathBuf,
    /// `owner/repo: sha` lines.
    pub repo_data: String,
    /// Glob patterns, matched against paths relative to `root`.
    pub exclude: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckoutOutput {
    pub checked_out: Vec<(PathBuf, RepoName)>,
    pub failed: Vec<(PathBuf, RepoName)>,
}

/// Parse `owner/repo: sha` lines; blank lines are ignored.
pub fn parse_repo_data(text: &str) -> Result<BTreeMap<RepoName, String>, AppError> {
    let mut repos = BTreeMap::new();
    for line in text.lines().map(str::trim).filter(|line| !line.is_empty()) {
        let (name, sha) = line.split_once(':').ok_or_else(|| AppError::ParseError {
            what: "repository data".to_string(),
            details: format!("expected 'owner/repo: sha', got '{}'", line),
        })?;
        repos.insert(name.trim().parse::<RepoName>()?, sha.trim().to_string());
    }
    Ok(repos)
}

/// Repository `owner/name` from a remote URL, whatever the host.
///
/// Handles scp-like (`git@host:owner/repo.git`) and URL forms (`https://`,
/// `ssh://`, `git://`).
pub fn parse_remote_url(url: &str) -> Option<RepoName> {
    let url = url.trim();
    let path = if let Some((_, rest)) = url.split_once("://") {
        rest.split_once('/')?.1
    } else if let Some((_, rest)) = url.split_once(':') {
        rest
    } else {
        return None;
    };

    let path = path.trim_end_matches('/').trim_end_matches(".git");
    let mut segments = path.rsplit('/');
    let name = segments.next()?;
    let owner = segments.next()?;
    RepoName::new(owner, name).ok()
}

fn compile_patterns(exclude: &[String]) -> Result<Vec<Pattern>, AppError> {
    exclude
        .iter()
        .map(|p| {
            Pattern::new(p).map_err(|e| AppError::ParseError {
                what: format!("exclude pattern '{}'", p),
                details: e.to_string(),
            })
        })
        .collect()
}

struct Walker<'a, G: GitCheckout> {
    git: &'a G,
    root: &'a Path,
    repos: &'a BTreeMap<RepoName, String>,
    exclude: Vec<Pattern>,
    output: CheckoutOutput,
}

impl<G: GitCheckout> Walker<'_, G> {
    fn is_excluded(&self, path: &Path) -> bool {
        let relative = path.strip_prefix(self.root).unwrap_or(path);
        self.exclude.iter().any(|p| p.matches_path(relative))
    }

    fn walk(&mut self, dir: &Path) -> Result<(), AppError> {
        let mut entries: Vec<_> = fs::read_dir(dir)?.collect::<Result<_, std::io::Error>>()?;
        entries.sort_by_key(|e| e.file_name());

        for entry in entries {
            let path = entry.path();
            if !entry.file_type()?.is_dir() || self.is_excluded(&path) {
                continue;
            }
            if entry.file_name() == ".git" {
                self.visit_checkout(dir);
            } else {
                self.walk(&path)?;
            }
        }
        Ok(())
    }

    fn visit_checkout(&mut self, dir: &Path) {
        let origin = match self.git.origin_url(dir) {
            Ok(Some(url)) => url,
            Ok(None) => return,
            Err(e) => {
                tracing::warn!("Failed to read origin of {}: {}", dir.display(), e);
                return;
            }
        };
        let Some(repo) = parse_remote_url(&origin) else {
            tracing::debug!("Unrecognized origin '{}' in {}", origin, dir.display());
            return;
        };
        let Some(sha) = self.repos.get(&repo) else {
            return;
        };

        match pin(self.git, dir, sha) {
            Ok(()) => {
                tracing::info!("Checked out {} at {} in {}", repo, sha, dir.display());
                self.output.checked_out.push((dir.to_path_buf(), repo));
            }
            Err(e) => {
                tracing::error!("Failed to checkout {} in {}: {}", sha, dir.display(), e);
                self.output.failed.push((dir.to_path_buf(), repo));
            }
        }
    }
}

fn pin(git: &impl GitCheckout, dir: &Path, sha: &str) -> Result<(), AppError> {
    if !git.has_commit(dir, sha)? {
        git.fetch_commit(dir, sha)?;
    }
    git.checkout_detached(dir, sha)
}

pub fn execute(
    git: &impl GitCheckout,
    options: CheckoutOptions,
) -> Result<CheckoutOutput, AppError> {
    let repos = parse_repo_data(&options.repo_data)?;
    let mut walker = Walker {
        git,
        root: &options.root,
        repos: &repos,
        exclude: compile_patterns(&options.exclude)?,
        output: CheckoutOutput::default(),
    };
    walker.walk(&options.root)?;
    Ok(walker.output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::repo;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use tempfile::TempDir;

    #[derive(Default)]
    struct FakeGit {
        origins: HashMap<PathBuf, String>,
        present: Vec<String>,
        broken: Vec<PathBuf>,
        calls: Mutex<Vec<String>>,
    }

    impl FakeGit {
        fn log(&self, call: String) {
            self.calls.lock().unwrap().push(call);
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl GitCheckout for FakeGit {
        fn origin_url(&self, repo_dir: &Path) -> Result<Option<String>, AppError> {
            Ok(self.origins.get(repo_dir).cloned())
        }

        fn has_commit(&self, _repo_dir: &Path, sha: &str) -> Result<bool, AppError> {
            Ok(self.present.iter().any(|s| s == sha))
        }

        fn fetch_commit(&self, repo_dir: &Path, sha: &str) -> Result<(), AppError> {
            if self.broken.iter().any(|p| p == repo_dir) {
                return Err(AppError::GitError {
                    command: "fetch".into(),
                    details: "unreachable".into(),
                });
            }
            self.log(format!("fetch {} {}", dir_name(repo_dir), sha));
            Ok(())
        }

        fn checkout_detached(&self, repo_dir: &Path, sha: &str) -> Result<(), AppError> {
            self.log(format!("checkout {} {}", dir_name(repo_dir), sha));
            Ok(())
        }
    }

    fn dir_name(path: &Path) -> String {
        path.file_name().unwrap().to_string_lossy().into_owned()
    }

    fn make_checkout(root: &Path, relative: &str) -> PathBuf {
        let dir = root.join(relative);
        fs::create_dir_all(dir.join(".git")).unwrap();
        dir
    }

    #[test]
    fn parses_repo_data_lines() {
        let repos = parse_repo_data("acme/a: 111\n\n  acme/b:222  \n").unwrap();
        assert_eq!(repos.get(&repo("acme/a")).map(String::as_str), Some("111"));
        assert_eq!(repos.get(&repo("acme/b")).map(String::as_str), Some("222"));
    }

    #[test]
    fn rejects_line_without_separator() {
        assert!(matches!(parse_repo_data("acme/a 111"), Err(AppError::ParseError { .. })));
    }

    #[test]
    fn parses_remote_urls() {
        let expected = Some(repo("acme/svc-a"));
        assert_eq!(parse_remote_url("git@github.com:acme/svc-a.git"), expected);
        assert_eq!(parse_remote_url("https://github.com/acme/svc-a.git"), expected);
        assert_eq!(parse_remote_url("https://github.com/acme/svc-a"), expected);
        assert_eq!(parse_remote_url("ssh://git@github.example.com:2222/acme/svc-a.git"), expected);
        assert_eq!(parse_remote_url("https://x-access-token:t@github.com/acme/svc-a/"), expected);
        assert_eq!(parse_remote_url("/srv/git/svc-a"), None);
    }

    #[test]
    fn pins_listed_checkouts_and_skips_excluded() {
        let root = TempDir::new().unwrap();
        let a = make_checkout(root.path(), "svc-a");
        let b = make_checkout(root.path(), "deps/svc-b");
        let c = make_checkout(root.path(), "vendor/svc-c");
        let other = make_checkout(root.path(), "unlisted");

        let mut git = FakeGit::default();
        git.origins.insert(a, "https://github.com/acme/svc-a.git".into());
        git.origins.insert(b, "git@github.com:acme/svc-b.git".into());
        git.origins.insert(c, "https://github.com/acme/svc-c".into());
        git.origins.insert(other, "https://github.com/acme/unlisted".into());
        git.present.push("aaa".into());

        let options = CheckoutOptions {
            root: root.path().to_path_buf(),
            repo_data: "acme/svc-a: aaa\nacme/svc-b: bbb\nacme/svc-c: ccc".into(),
            exclude: vec!["vendor/**".into()],
        };
        let output = execute(&git, options).unwrap();

        assert_eq!(
            git.calls(),
            vec![
                "fetch svc-b bbb".to_string(),
                "checkout svc-b bbb".to_string(),
                "checkout svc-a aaa".to_string(),
            ]
        );
        assert_eq!(output.checked_out.len(), 2);
        assert!(output.failed.is_empty());
    }

    #[test]
    fn failures_do_not_stop_the_walk() {
        let root = TempDir::new().unwrap();
        let a = make_checkout(root.path(), "a");
        let b = make_checkout(root.path(), "b");

        let mut git = FakeGit::default();
        git.origins.insert(a.clone(), "https://github.com/acme/svc-a.git".into());
        git.origins.insert(b, "https://github.com/acme/svc-b.git".into());
        git.broken.push(a.clone());

        let options = CheckoutOptions {
            root: root.path().to_path_buf(),
            repo_data: "acme/svc-a: aaa\nacme/svc-b: bbb".into(),
            exclude: Vec::new(),
        };
        let output = execute(&git, options).unwrap();

        assert_eq!(output.failed, vec![(a, repo("acme/svc-a"))]);
        assert_eq!(output.checked_out.len(), 1);
    }

    #[test]
    fn invalid_exclude_pattern_is_rejected() {
        let root = TempDir::new().unwrap();
        let options = CheckoutOptions {
            root: root.path().to_path_buf(),
            repo_data: String::new(),
            exclude: vec!["[".into()],
        };
        assert!(execute(&FakeGit::default(), options).is_err());
    }
}
