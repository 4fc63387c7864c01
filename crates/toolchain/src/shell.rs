use crate::Toolchain;
use crate::error::{ErrorKind, Result};
use async_trait::async_trait;
use exn::ResultExt;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::instrument;

/// Schema export followed by per-table data export, both piped into
/// `sqlite3`. The data export runs even when the schema export fails.
///
/// Exit status: the table listing's own status when the source can't be
/// listed (missing or unreadable file), otherwise that of the last table's
/// import, or zero for a database with no tables.
///
/// Paths are passed as positional arguments (`$1` source, `$2` destination)
/// and executables through the environment, so nothing is ever interpolated
/// into the script itself.
const SCRIPT: &str = r#"
"$MDB_SCHEMA" "$1" sqlite | "$SQLITE3" "$2"
tables=$("$MDB_TABLES" -1 "$1") || exit $?
printf '%s\n' "$tables" | while IFS= read -r table; do
    if [ -n "$table" ]; then
        "$MDB_EXPORT" -I sqlite "$1" "$table" | "$SQLITE3" "$2"
    fi
done
"#;

/// Names (or paths) of the executables making up the toolchain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolNames {
    pub shell: String,
    pub mdb_schema: String,
    pub mdb_tables: String,
    pub mdb_export: String,
    pub sqlite3: String,
}
impl Default for ToolNames {
    fn default() -> Self {
        Self {
            shell: "sh".to_string(),
            mdb_schema: "mdb-schema".to_string(),
            mdb_tables: "mdb-tables".to_string(),
            mdb_export: "mdb-export".to_string(),
            sqlite3: "sqlite3".to_string(),
        }
    }
}

/// The mdbtools + sqlite3 toolchain, driven through a POSIX shell.
#[derive(Debug, Clone)]
pub struct ShellToolchain {
    shell: PathBuf,
    mdb_schema: PathBuf,
    mdb_tables: PathBuf,
    mdb_export: PathBuf,
    sqlite3: PathBuf,
}
impl ShellToolchain {
    /// Resolve every executable in `names` on `PATH`.
    ///
    /// Fails with [`ErrorKind::ToolNotFound`] naming the first executable
    /// that could not be found.
    pub fn discover(names: &ToolNames) -> Result<Self> {
        Ok(Self {
            shell: Self::find(&names.shell)?,
            mdb_schema: Self::find(&names.mdb_schema)?,
            mdb_tables: Self::find(&names.mdb_tables)?,
            mdb_export: Self::find(&names.mdb_export)?,
            sqlite3: Self::find(&names.sqlite3)?,
        })
    }

    fn find(name: &str) -> Result<PathBuf> {
        let path = which::which(name).or_raise(|| ErrorKind::ToolNotFound(name.to_string()))?;
        tracing::trace!(tool = name, path = %path.display(), "Discovered executable");
        Ok(path)
    }
}

#[async_trait]
impl Toolchain for ShellToolchain {
    #[instrument(skip_all, fields(source = %source.display(), destination = %destination.display()))]
    async fn run(&self, source: &Path, destination: &Path) -> Result<i32> {
        let output = Command::new(&self.shell)
            .arg("-c")
            .arg(SCRIPT)
            // $0, which the shell uses in its own error messages.
            .arg("mdbridge")
            .arg(source)
            .arg(destination)
            .env("MDB_SCHEMA", &self.mdb_schema)
            .env("MDB_TABLES", &self.mdb_tables)
            .env("MDB_EXPORT", &self.mdb_export)
            .env("SQLITE3", &self.sqlite3)
            .stdin(Stdio::null())
            .output()
            .await
            .or_raise(|| ErrorKind::Spawn(source.display().to_string()))?;
        let Some(code) = output.status.code() else {
            tracing::warn!(status = %output.status, "Conversion terminated without an exit code");
            return Ok(-1);
        };
        if code != 0 {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::warn!(code, stderr = %stderr.trim(), "Conversion exited with non-zero status");
        }
        Ok(code)
    }
}
