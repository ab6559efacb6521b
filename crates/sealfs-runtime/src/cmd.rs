//! Command invocation.

use std::io::Write;

/// A command to execute: the path of an executable resource, its
/// arguments and where its output goes.
///
/// Output is discarded unless [`with_output`](Self::with_output) is used.
///
/// ```
/// use sealfs_runtime::Cmd;
///
/// let cmd = Cmd::new("/bin/ls", ["-R", "/"]);
/// assert_eq!(cmd.to_string(), "/bin/ls -R /");
/// ```
pub struct Cmd<'a> {
    abspath: String,
    args: Vec<String>,
    out: Box<dyn Write + 'a>,
}

impl<'a> Cmd<'a> {
    pub fn new<I, S>(abspath: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            abspath: abspath.into(),
            args: args.into_iter().map(Into::into).collect(),
            out: Box::new(std::io::sink()),
        }
    }

    /// Directs command output to `out`.
    #[must_use]
    pub fn with_output(mut self, out: impl Write + 'a) -> Self {
        self.out = Box::new(out);
        self
    }

    #[must_use]
    pub fn abspath(&self) -> &str {
        &self.abspath
    }

    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Command name: the last segment of its path.
    #[must_use]
    pub fn name(&self) -> &str {
        self.abspath.rsplit('/').next().unwrap_or(&self.abspath)
    }

    pub fn out(&mut self) -> &mut dyn Write {
        &mut *self.out
    }
}

impl std::fmt::Display for Cmd<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.abspath)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for Cmd<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cmd")
            .field("abspath", &self.abspath)
            .field("args", &self.args)
            .finish_non_exhaustive()
    }
}
