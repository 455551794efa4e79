/*!
# IO

Reading and writing graphs from and to the line-oriented **board format** (see [`board`]).

## Traits

To generalize over reading/writing:
- [`GraphReader`] and [`GraphWriter`] are implemented by configurable readers and writers
  ([`BoardReader`], [`BoardWriter`]).
- [`BoardRead`] and [`BoardWrite`] are shorthands on the graph itself that use the default
  settings.

Errors are reported as [`std::io::Error`]; inconsistent graph data found while loading is
converted from [`GraphError`] with [`std::io::ErrorKind::InvalidData`].
*/

pub mod board;

use std::{
    fs::File,
    io::{BufRead, BufReader, BufWriter, Result, Write},
    path::Path,
};

use crate::prelude::*;

pub use board::*;

/// Loads a graph of type `G` from its textual form.
///
/// Implementors only parse a stream; opening files is handled by the provided method.
pub trait GraphReader<G> {
    /// Parses one graph from `reader`, consuming the stream up to its end.
    ///
    /// # Errors
    /// Fails with [`std::io::ErrorKind::InvalidData`] on malformed input (unknown section
    /// markers, rows of the wrong length, values that do not parse, missing graph kind) and
    /// passes through any error of the underlying stream.
    fn try_read_graph<R>(&self, reader: R) -> Result<G>
    where
        R: BufRead;

    /// Opens `path` and parses its content with [`GraphReader::try_read_graph`].
    ///
    /// # Errors
    /// Additionally fails if the file cannot be opened.
    fn try_read_graph_file<P>(&self, path: P) -> Result<G>
    where
        P: AsRef<Path>,
    {
        self.try_read_graph(BufReader::new(File::open(path)?))
    }
}

/// Stores a graph of type `G` in textual form.
///
/// The written text is meant to be loaded back by the matching [`GraphReader`].
pub trait GraphWriter<G> {
    /// Emits every section of `graph` into `writer`.
    ///
    /// # Errors
    /// Only errors of the underlying stream are reported.
    fn try_write_graph<W>(&self, graph: &G, writer: W) -> Result<()>
    where
        W: Write;

    /// Creates (or truncates) `path` and writes `graph` into it.
    ///
    /// # Errors
    /// Additionally fails if the file cannot be created.
    fn try_write_graph_file<P>(&self, graph: &G, path: P) -> Result<()>
    where
        P: AsRef<Path>,
    {
        self.try_write_graph(graph, BufWriter::new(File::create(path)?))
    }
}

/// Builds an [`std::io::Error`] of the given kind with a message
macro_rules! io_error {
    ($kind: expr, $info: expr) => {
        std::io::Error::new($kind, $info)
    };
}

/// Bails out of the surrounding reader function with an [`std::io::Error`] if `$cond` is false
macro_rules! raise_error_unless {
    ($cond : expr, $kind : expr, $info : expr) => {
        if !($cond) {
            return Err(io_error!($kind, $info));
        }
    };
}

/// Takes the next whitespace-separated token of a board row and parses it into the inferred
/// type. A missing or unparsable token makes the surrounding function return
/// [`std::io::ErrorKind::InvalidData`] naming `$name`.
macro_rules! parse_next_value {
    ($iterator : expr, $name : expr) => {{
        let token = match $iterator.next() {
            Some(token) => token,
            None => {
                return Err(io_error!(
                    std::io::ErrorKind::InvalidData,
                    format!("Row ends before {} is complete.", $name)
                ))
            }
        };

        match token.parse() {
            Ok(value) => value,
            Err(_) => {
                return Err(io_error!(
                    std::io::ErrorKind::InvalidData,
                    format!("Token '{}' is not a valid value for {}.", token, $name)
                ))
            }
        }
    }};
}

use io_error;
use parse_next_value;
use raise_error_unless;
