//! Deterministic git command resolution.
//!
//! [`GitResolver`] maps a verb plus arguments (`push --force`, `undo add`,
//! `commit -m fix typo`) onto a concrete git invocation through a fixed
//! action table. Verbs without a rule are reconstructed verbatim.

use crate::providers::{BranchProvider, DETACHED_REF, GitBranchProvider};
use tracing::debug;

type Rule = fn(&GitResolver, &[&str]) -> String;

const LEASE: &str = "--force-with-lease";

/// Verb aliases → rule. Lookup is by exact verb match.
const ACTION_TABLE: &[(&[&str], Rule)] = &[
    (&["branch"], GitResolver::branch),
    (&["checkout", "switch"], GitResolver::switch),
    (&["commit"], GitResolver::commit),
    (&["amend"], GitResolver::amend),
    (&["push"], GitResolver::push),
    (&["publish"], GitResolver::publish),
    (&["pull"], GitResolver::pull),
    (&["sync"], GitResolver::sync),
    (&["stash"], GitResolver::stash),
    (&["log"], GitResolver::log),
    (&["diff"], GitResolver::diff),
    (&["undo"], GitResolver::undo),
    (&["uncommit"], GitResolver::uncommit),
    (&["unstage"], GitResolver::unstage),
    (&["discard"], GitResolver::discard),
    (&["abort"], GitResolver::abort),
    (&["cleanup"], GitResolver::cleanup),
    (&["tag"], GitResolver::tag),
    (&["rebase"], GitResolver::rebase),
    (&["fetch"], GitResolver::fetch),
    (&["cherry-pick"], GitResolver::cherry_pick),
    (&["bisect"], GitResolver::bisect),
    (&["show"], GitResolver::show),
    (&["clone"], GitResolver::clone_repo),
    (&["init"], GitResolver::init),
];

fn lookup(verb: &str) -> Option<Rule> {
    ACTION_TABLE
        .iter()
        .find(|(verbs, _)| verbs.contains(&verb))
        .map(|(_, rule)| *rule)
}

/// Returns true when `verb` has a dedicated rule in the action table.
pub fn has_rule(verb: &str) -> bool {
    lookup(verb).is_some()
}

/// `git <verb> <rest...>` without trailing whitespace.
pub fn verbatim(verb: &str, rest: &[&str]) -> String {
    std::iter::once("git")
        .chain(std::iter::once(verb))
        .chain(rest.iter().copied())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Joins words into a single shell argument, quoted only when needed.
fn quote(words: &[&str]) -> String {
    let message = words.join(" ").replace('\0', "");
    shlex::try_quote(&message)
        .map(|quoted| quoted.into_owned())
        .unwrap_or_else(|_| "''".to_string())
}

/// Rewrites a force flag to `--force-with-lease`. Short-flag clusters that
/// include `f` (`-fu`) keep their remaining flags.
fn lease_force(arg: &str) -> Vec<String> {
    if arg == "--force" {
        return vec![LEASE.to_string()];
    }
    match arg.strip_prefix('-') {
        Some(flags) if flags.contains('f') && flags.chars().all(|c| c.is_ascii_alphabetic()) => {
            let rest: String = flags.chars().filter(|c| *c != 'f').collect();
            let mut args = vec![LEASE.to_string()];
            if !rest.is_empty() {
                args.push(format!("-{}", rest));
            }
            args
        }
        _ => vec![arg.to_string()],
    }
}

fn is_count(arg: &str) -> bool {
    !arg.is_empty() && arg.chars().all(|c| c.is_ascii_digit())
}

fn paths_or_all(rest: &[&str]) -> String {
    if rest.is_empty() || rest == ["all"] {
        ".".to_string()
    } else {
        rest.join(" ")
    }
}

/// Table-driven resolver for `!git` requests.
pub struct GitResolver {
    branches: Box<dyn BranchProvider>,
}

impl GitResolver {
    /// Creates a resolver that reads the current branch from git.
    pub fn new() -> Self {
        Self::with_branch_provider(Box::new(GitBranchProvider))
    }

    pub fn with_branch_provider(branches: Box<dyn BranchProvider>) -> Self {
        Self { branches }
    }

    /// Resolves `args` into a git command. Never fails.
    ///
    /// ```
    /// use hintsh::git_patterns::GitResolver;
    /// use hintsh::providers::FixedBranchProvider;
    ///
    /// let resolver = GitResolver::with_branch_provider(Box::new(FixedBranchProvider::new("main")));
    /// assert_eq!(resolver.resolve(&[]), "git status");
    /// assert_eq!(resolver.resolve(&["push".to_string()]), "git push origin main");
    /// ```
    pub fn resolve(&self, args: &[String]) -> String {
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        let Some((verb, rest)) = args.split_first() else {
            return "git status".to_string();
        };

        match lookup(verb) {
            Some(rule) => rule(self, rest),
            None => {
                debug!("No git rule for '{}', reconstructing verbatim", verb);
                verbatim(verb, rest)
            }
        }
    }

    fn current_branch(&self) -> String {
        self.branches
            .current_branch()
            .unwrap_or_else(|| DETACHED_REF.to_string())
    }

    fn branch(&self, rest: &[&str]) -> String {
        match rest {
            [] => "git branch -vv".to_string(),
            ["new" | "create", name, ..] => format!("git switch -c {}", name),
            ["delete", name, ..] => format!("git branch -d {}", name),
            ["rename", name, ..] => format!("git branch -m {}", name),
            _ => verbatim("branch", rest),
        }
    }

    fn switch(&self, rest: &[&str]) -> String {
        match rest {
            [] => "git switch -".to_string(),
            ["-b" | "-c" | "new" | "create", name, ..] => format!("git switch -c {}", name),
            _ => verbatim("switch", rest),
        }
    }

    fn commit(&self, rest: &[&str]) -> String {
        match rest {
            [] => "git commit".to_string(),
            ["-m" | "--message"] => "git commit".to_string(),
            ["-m" | "--message", words @ ..] => format!("git commit -m {}", quote(words)),
            ["-a" | "--all" | "all", after @ ..] => match after {
                [] | ["-m" | "--message"] => "git commit -a".to_string(),
                ["-m" | "--message", words @ ..] => format!("git commit -am {}", quote(words)),
                [first, ..] if first.starts_with('-') => verbatim("commit", rest),
                words => format!("git commit -am {}", quote(words)),
            },
            [first, ..] if first.starts_with('-') => verbatim("commit", rest),
            words => format!("git commit -m {}", quote(words)),
        }
    }

    fn amend(&self, rest: &[&str]) -> String {
        let words = match rest {
            ["-m" | "--message", words @ ..] => words,
            words => words,
        };
        if words.is_empty() {
            "git commit --amend --no-edit".to_string()
        } else {
            format!("git commit --amend -m {}", quote(words))
        }
    }

    fn push(&self, rest: &[&str]) -> String {
        if rest.is_empty() {
            return format!("git push origin {}", self.current_branch());
        }

        let mut args: Vec<String> = Vec::with_capacity(rest.len());
        for arg in rest.iter().flat_map(|arg| lease_force(arg)) {
            if arg == LEASE && args.contains(&arg) {
                continue;
            }
            args.push(arg);
        }
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        verbatim("push", &args)
    }

    fn publish(&self, _rest: &[&str]) -> String {
        format!("git push -u origin {}", self.current_branch())
    }

    fn pull(&self, rest: &[&str]) -> String {
        if rest.is_empty() {
            "git pull --rebase".to_string()
        } else {
            verbatim("pull", rest)
        }
    }

    fn sync(&self, _rest: &[&str]) -> String {
        "git pull --rebase && git push".to_string()
    }

    fn stash(&self, rest: &[&str]) -> String {
        match rest {
            [] => "git stash push".to_string(),
            ["list" | "pop" | "apply" | "drop" | "show" | "clear", ..] => verbatim("stash", rest),
            ["save" | "push"] => "git stash push".to_string(),
            ["save" | "push", words @ ..] => format!("git stash push -m {}", quote(words)),
            [first, ..] if first.starts_with('-') => verbatim("stash", rest),
            words => format!("git stash push -m {}", quote(words)),
        }
    }

    fn log(&self, rest: &[&str]) -> String {
        match rest {
            [] => "git log --oneline --graph --decorate -n 20".to_string(),
            [count] if is_count(count) => format!("git log --oneline -n {}", count),
            _ => verbatim("log", rest),
        }
    }

    fn diff(&self, rest: &[&str]) -> String {
        match rest {
            [] => "git diff".to_string(),
            ["staged" | "cached", paths @ ..] => {
                let mut args = vec!["--cached"];
                args.extend_from_slice(paths);
                verbatim("diff", &args)
            }
            _ => verbatim("diff", rest),
        }
    }

    fn undo(&self, rest: &[&str]) -> String {
        match rest {
            [] | ["commit"] => "git reset HEAD~1".to_string(),
            ["add", paths @ ..] => self.unstage(paths),
            paths => format!("git restore {}", paths.join(" ")),
        }
    }

    fn uncommit(&self, _rest: &[&str]) -> String {
        "git reset --soft HEAD~1".to_string()
    }

    fn unstage(&self, rest: &[&str]) -> String {
        format!("git restore --staged {}", paths_or_all(rest))
    }

    fn discard(&self, rest: &[&str]) -> String {
        format!("git restore {}", paths_or_all(rest))
    }

    fn abort(&self, _rest: &[&str]) -> String {
        "git merge --abort || git rebase --abort".to_string()
    }

    fn cleanup(&self, _rest: &[&str]) -> String {
        "git remote prune origin && git gc --prune=now".to_string()
    }

    fn tag(&self, rest: &[&str]) -> String {
        match rest {
            [] => "git tag --list".to_string(),
            ["delete", name, ..] => format!("git tag -d {}", name),
            ["push"] => "git push --tags".to_string(),
            [name, words @ ..] if !name.starts_with('-') && !words.is_empty() => {
                format!("git tag -a {} -m {}", name, quote(words))
            }
            _ => verbatim("tag", rest),
        }
    }

    fn rebase(&self, rest: &[&str]) -> String {
        match rest {
            [] => "git rebase -i HEAD~3".to_string(),
            [sub @ ("continue" | "abort" | "skip")] => format!("git rebase --{}", sub),
            [count] if is_count(count) => format!("git rebase -i HEAD~{}", count),
            _ => verbatim("rebase", rest),
        }
    }

    fn fetch(&self, rest: &[&str]) -> String {
        if rest.is_empty() {
            "git fetch --all --prune".to_string()
        } else {
            verbatim("fetch", rest)
        }
    }

    fn cherry_pick(&self, rest: &[&str]) -> String {
        match rest {
            [sub @ ("continue" | "abort" | "skip")] => format!("git cherry-pick --{}", sub),
            _ => verbatim("cherry-pick", rest),
        }
    }

    fn bisect(&self, rest: &[&str]) -> String {
        if rest.is_empty() {
            "git bisect start".to_string()
        } else {
            verbatim("bisect", rest)
        }
    }

    fn show(&self, rest: &[&str]) -> String {
        if rest.is_empty() {
            "git show --stat HEAD".to_string()
        } else {
            verbatim("show", rest)
        }
    }

    fn clone_repo(&self, rest: &[&str]) -> String {
        if !rest.contains(&"shallow") {
            return verbatim("clone", rest);
        }
        let mut args = vec!["--depth", "1"];
        args.extend(rest.iter().copied().filter(|arg| *arg != "shallow"));
        verbatim("clone", &args)
    }

    fn init(&self, rest: &[&str]) -> String {
        if rest.is_empty() {
            "git init -b main".to_string()
        } else {
            verbatim("init", rest)
        }
    }
}

impl Default for GitResolver {
    fn default() -> Self {
        Self::new()
    }
}
