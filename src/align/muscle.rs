use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use crate::align::{AlignError, MultipleAligner};
use crate::parsing::fasta::{read_fasta, FastaEntry};

/// Runs an external MUSCLE executable, FASTA in on stdin and out on stdout
#[derive(Debug, Clone)]
pub struct MuscleAligner {
    program: PathBuf,
    args: Vec<String>,
}

impl MuscleAligner {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Extra command-line arguments passed on every invocation
    #[must_use]
    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }
}

impl Default for MuscleAligner {
    fn default() -> Self {
        Self::new("muscle")
    }
}

/// Render records as unwrapped FASTA text
pub fn to_fasta(records: &[FastaEntry]) -> Vec<u8> {
    let mut buf = Vec::new();
    for record in records {
        buf.extend_from_slice(b">");
        buf.extend_from_slice(record.id.as_bytes());
        buf.push(b'\n');
        buf.extend_from_slice(record.sequence.as_bytes());
        buf.push(b'\n');
    }
    buf
}

impl MultipleAligner for MuscleAligner {
    fn align(&self, records: &[FastaEntry]) -> Result<Vec<FastaEntry>, AlignError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| AlignError::Spawn {
                program: self.program.display().to_string(),
                source,
            })?;

        // Feed stdin from another thread so a full stdout pipe cannot block us
        let input = to_fasta(records);
        let mut stdin = child.stdin.take().ok_or_else(|| {
            AlignError::Io(std::io::Error::other("aligner stdin was not captured"))
        })?;
        let feeder = std::thread::spawn(move || stdin.write_all(&input));

        let output = child.wait_with_output()?;
        let fed = feeder
            .join()
            .map_err(|_| AlignError::Io(std::io::Error::other("aligner input thread panicked")))?;

        // An aligner that exits early also breaks the pipe; report the exit first
        if !output.status.success() {
            return Err(AlignError::AlignerFailed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        fed?;

        Ok(read_fasta(&output.stdout[..])?)
    }
}
