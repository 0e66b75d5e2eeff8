use std::path::PathBuf;

use thiserror::Error;

use crate::frontend::lexer::Span;

/// Location in the compiler's own source where an error was raised
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RaisedAt {
    pub module: &'static str,
    pub file: &'static str,
    pub line: u32,
}

macro_rules! raised_at {
    () => {
        $crate::error::RaisedAt {
            module: module_path!(),
            file: file!(),
            line: line!(),
        }
    };
}

pub(crate) use raised_at;

#[derive(Debug, Error)]
pub enum CompileError {
    #[error("{message}")]
    Lex {
        span: Span,
        message: String,
        raised_at: RaisedAt,
    },

    #[error("{message}")]
    Parse {
        span: Span,
        message: String,
        raised_at: RaisedAt,
    },

    #[error("line {line}: {message}")]
    IrParse { line: usize, message: String },

    #[error("could not access `{}`: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CompileError {
    /// The offending span in the source file, if the error has one
    pub fn span(&self) -> Option<Span> {
        match self {
            Self::Lex { span, .. } | Self::Parse { span, .. } => Some(*span),
            Self::IrParse { .. } | Self::Io { .. } => None,
        }
    }

    pub fn raised_at(&self) -> Option<RaisedAt> {
        match self {
            Self::Lex { raised_at, .. } | Self::Parse { raised_at, .. } => Some(*raised_at),
            Self::IrParse { .. } | Self::Io { .. } => None,
        }
    }
}
