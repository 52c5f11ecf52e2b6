use std::borrow::Cow;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Directive that clones the repository inside the build VM.
pub const CHECKOUT_LINE: &str = "travis_run_checkout";

/// Directive that prints the build banner; the project is in place by then.
pub const ANNOUNCE_LINE: &str = "travis_run_announce";

/// Line-by-line rewrite of a compiled build script for local execution.
///
/// The project is copied into the image instead of cloned, so:
///
/// 1. the first `travis_run_checkout` line is commented out, and
/// 2. `cd <project_dir>` is inserted right before the first
///    `travis_run_announce` line.
///
/// Matching is on whole lines, exactly. Every other byte passes through
/// untouched. Filtering an already filtered script changes nothing as long
/// as the compiled script carried at most one live checkout line.
#[derive(Debug, Clone)]
pub struct ScriptFilter {
    cd_line: String,
    checkout_seen: bool,
    announce_seen: bool,
    prev_was_cd: bool,
}

impl ScriptFilter {
    pub fn new(project_dir: &str) -> Self {
        Self {
            cd_line: format!("cd {project_dir}"),
            checkout_seen: false,
            announce_seen: false,
            prev_was_cd: false,
        }
    }

    /// Filter one line, including its trailing `\n` if it has one.
    pub fn filter_line<'a>(&mut self, line: &'a str) -> Cow<'a, str> {
        let content = line.strip_suffix('\n').unwrap_or(line);

        let out = if !self.checkout_seen && content == CHECKOUT_LINE {
            self.checkout_seen = true;
            Cow::Owned(format!("#{line}"))
        } else if !self.announce_seen && content == ANNOUNCE_LINE {
            self.announce_seen = true;
            if self.prev_was_cd {
                Cow::Borrowed(line)
            } else {
                Cow::Owned(format!("{}\n{line}", self.cd_line))
            }
        } else {
            Cow::Borrowed(line)
        };

        self.prev_was_cd = content == self.cd_line;
        out
    }

    /// Filter a whole script held in memory.
    pub fn apply(mut self, script: &str) -> String {
        let mut out = String::with_capacity(script.len() + self.cd_line.len() + 2);
        for line in script.split_inclusive('\n') {
            out.push_str(&self.filter_line(line));
        }
        out
    }
}

/// Rewrite `script` for local execution and write it to `dest`.
pub fn write_script(dest: &Path, script: &str, project_dir: &str) -> Result<(), ScriptError> {
    let write_err = |e| ScriptError::Write {
        path: dest.to_path_buf(),
        source: e,
    };

    let file = std::fs::File::create(dest).map_err(write_err)?;
    let mut writer = BufWriter::new(file);
    let mut filter = ScriptFilter::new(project_dir);

    for line in script.split_inclusive('\n') {
        writer
            .write_all(filter.filter_line(line).as_bytes())
            .map_err(write_err)?;
    }
    writer.flush().map_err(write_err)?;

    tracing::debug!(path = %dest.display(), bytes = script.len(), "build script written");
    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    #[error("failed to write build script at {path}")]
    Write {
        path: std::path::PathBuf,
        source: std::io::Error,
    },
}
