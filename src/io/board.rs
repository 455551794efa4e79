/*!
# Board Format

A line-oriented text format that stores a [`Graph`] with all of its vectors.

Every line is classified by its first character:
- `#` (the *comment identifier*) or an empty line closes the current section,
- `t <k>` sets the graph kind (`d`irected, `u`ndirected or `r`esidual),
- `N`, `A`, `B`, `c`, `u`, `f`, `x` open a data section,
- `[` starts a data row of the open section: comma separated numbers in brackets.

| Section | Rows | Content                                                              |
|---------|------|----------------------------------------------------------------------|
| `N`     | 2    | first and last outgoing arc position of every node (`-1` if none)    |
| `A`     | 3    | tail, head (1-indexed nodes) and next outgoing arc of every arc (`0` = end) |
| `B`     | 1    | external flow of every node                                          |
| `c`     | 1    | costs                                                                |
| `u`     | 1    | capacities                                                           |
| `f`     | 1    | flows, or `1` / `-1` markers of forward and backward arcs in a residual graph |
| `x`     | 2    | x- and y-coordinates of every node                                   |

The forward-star links stored in `N` and `A` are redundant: the reader rebuilds them by replaying
the arcs in position order and warns if the file disagrees. Source and sink are not stored.

# Examples
```
use flowboard::{prelude::*, io::*};
use std::io::Cursor;

let mut graph = Graph::from_arcs(GraphKind::Directed, 3, [(0, 1), (1, 2)]);
graph.set_capacities(vec![4.0, 2.5]).unwrap();

let mut buffer = Vec::new();
graph.try_write_board(&mut buffer).unwrap();
let text = String::from_utf8(buffer.clone()).unwrap();
assert!(text.contains("t d\n"));
assert!(text.contains("u\n[4.0, 2.5]\n"));

let copy = Graph::try_read_board(Cursor::new(buffer)).unwrap();
assert_eq!(copy, graph);
```
*/

use std::{
    fmt::Debug,
    fs::File,
    io::{BufRead, BufWriter, ErrorKind, Write},
    path::Path,
    str::FromStr,
};

use itertools::Itertools;
use tracing::warn;

use super::*;

/// Sections of a board file
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Section {
    Nodes,
    Arcs,
    Supplies,
    Costs,
    Capacities,
    Flows,
    Coordinates,
}

impl Section {
    fn from_marker(c: char) -> Option<Self> {
        Some(match c {
            'N' => Section::Nodes,
            'A' => Section::Arcs,
            'B' => Section::Supplies,
            'c' => Section::Costs,
            'u' => Section::Capacities,
            'f' => Section::Flows,
            'x' => Section::Coordinates,
            _ => return None,
        })
    }

    fn marker(&self) -> char {
        match self {
            Section::Nodes => 'N',
            Section::Arcs => 'A',
            Section::Supplies => 'B',
            Section::Costs => 'c',
            Section::Capacities => 'u',
            Section::Flows => 'f',
            Section::Coordinates => 'x',
        }
    }

    /// Number of rows a complete section consists of
    fn rows(&self) -> usize {
        match self {
            Section::Nodes | Section::Coordinates => 2,
            Section::Arcs => 3,
            _ => 1,
        }
    }
}

/// Parses a row `[v1, v2, ...]`; `[]` is the empty row
fn parse_row<T>(line: &str, section: Section) -> Result<Vec<T>>
where
    T: FromStr,
{
    let inner = line.trim_end();
    raise_error_unless!(
        inner.starts_with('[') && inner.ends_with(']'),
        ErrorKind::InvalidData,
        format!("Row of section {} is not enclosed in brackets.", section.marker())
    );

    let inner = inner[1..inner.len() - 1].trim();
    if inner.is_empty() {
        return Ok(Vec::new());
    }

    let mut values = inner.split(',').map(str::trim);
    let mut row = Vec::new();
    while values.clone().next().is_some() {
        row.push(parse_next_value!(values, format!("section {}", section.marker())));
    }
    Ok(row)
}

/// Rows of all sections seen so far
#[derive(Debug, Default)]
struct Sections {
    kind: Option<GraphKind>,
    nodes: Vec<Vec<i64>>,
    arcs: Vec<Vec<i64>>,
    supplies: Vec<Vec<f64>>,
    costs: Vec<Vec<f64>>,
    capacities: Vec<Vec<f64>>,
    flows: Vec<Vec<f64>>,
    coordinates: Vec<Vec<f64>>,
}

impl Sections {
    fn push_row(&mut self, section: Section, line: &str) -> Result<()> {
        match section {
            Section::Nodes => self.nodes.push(parse_row(line, section)?),
            Section::Arcs => self.arcs.push(parse_row(line, section)?),
            Section::Supplies => self.supplies.push(parse_row(line, section)?),
            Section::Costs => self.costs.push(parse_row(line, section)?),
            Section::Capacities => self.capacities.push(parse_row(line, section)?),
            Section::Flows => self.flows.push(parse_row(line, section)?),
            Section::Coordinates => self.coordinates.push(parse_row(line, section)?),
        }
        Ok(())
    }

    fn check_rows(&self) -> Result<()> {
        for (section, rows) in [
            (Section::Nodes, self.nodes.len()),
            (Section::Arcs, self.arcs.len()),
            (Section::Supplies, self.supplies.len()),
            (Section::Costs, self.costs.len()),
            (Section::Capacities, self.capacities.len()),
            (Section::Flows, self.flows.len()),
            (Section::Coordinates, self.coordinates.len()),
        ] {
            raise_error_unless!(
                rows == 0 || rows == section.rows(),
                ErrorKind::InvalidData,
                format!(
                    "Section {} has {rows} rows, expected {}.",
                    section.marker(),
                    section.rows()
                )
            );
        }
        Ok(())
    }

    /// Converts the rows into a graph and reports links that disagree with the replay
    fn into_graph(mut self) -> Result<Graph> {
        self.check_rows()?;
        let kind = self.kind.ok_or(io_error!(
            ErrorKind::InvalidData,
            "Graph kind (t-line) not found."
        ))?;

        let n = self.nodes.first().map_or(0, |row| row.len());
        raise_error_unless!(
            self.nodes.iter().all(|row| row.len() == n),
            ErrorKind::InvalidData,
            "Rows of section N differ in length."
        );
        let m = self.arcs.first().map_or(0, |row| row.len());
        raise_error_unless!(
            self.arcs.iter().all(|row| row.len() == m),
            ErrorKind::InvalidData,
            "Rows of section A differ in length."
        );

        let stored_kind = match kind {
            GraphKind::Residual => GraphKind::Directed,
            kind => kind,
        };
        let mut graph = Graph::with_nodes(stored_kind, n as NumNodes);

        if m > 0 {
            for (&tail, &head) in self.arcs[0].iter().zip(&self.arcs[1]) {
                raise_error_unless!(
                    (1..=n as i64).contains(&tail) && (1..=n as i64).contains(&head),
                    ErrorKind::InvalidData,
                    format!("Arc ({tail},{head}) references a node outside of 1..={n}.")
                );
                graph.add_arc((tail - 1) as Node, (head - 1) as Node)?;
            }
            check_links(&graph, &self.nodes, &self.arcs[2]);
        }

        if let Some(row) = self.supplies.pop() {
            graph.set_supplies(row)?;
        }
        if let Some(row) = self.costs.pop() {
            graph.set_costs(row)?;
        }
        if let Some(row) = self.capacities.pop() {
            graph.set_capacities(row)?;
        }
        if !self.coordinates.is_empty() {
            let coords = self.coordinates[0]
                .iter()
                .zip_longest(&self.coordinates[1])
                .map(|pair| match pair {
                    itertools::EitherOrBoth::Both(&x, &y) => Ok(Point::new(x, y)),
                    _ => Err(io_error!(
                        ErrorKind::InvalidData,
                        "Rows of section x differ in length."
                    )),
                })
                .collect::<Result<Vec<_>>>()?;
            graph.set_coordinates(coords)?;
        }

        let flows = self.flows.pop();
        if kind == GraphKind::Residual {
            let markers = flows.ok_or(io_error!(
                ErrorKind::InvalidData,
                "Residual graph without forward/backward markers (section f)."
            ))?;
            let directions = markers
                .iter()
                .map(|&marker| {
                    if marker == Direction::Forward.marker() {
                        Ok(Direction::Forward)
                    } else if marker == Direction::Backward.marker() {
                        Ok(Direction::Backward)
                    } else {
                        Err(io_error!(
                            ErrorKind::InvalidData,
                            format!("Invalid residual marker {marker}.")
                        ))
                    }
                })
                .collect::<Result<Vec<_>>>()?;
            graph.pair_mirrors(&directions)?;
        } else if let Some(row) = flows {
            graph.set_flows(row)?;
        }

        Ok(graph)
    }
}

/// Compares the forward-star links of the file with those of the replayed graph
fn check_links(graph: &Graph, nodes: &[Vec<i64>], next: &[i64]) {
    let as_link = |pos: Option<ArcPos>| pos.map_or(-1, |p| p as i64);

    let nodes_agree = nodes.len() == 2
        && graph.vertices().all(|u| {
            nodes[0][u as usize] == as_link(graph.first_out_arc(u))
                && nodes[1][u as usize] == as_link(graph.last_out_arc(u))
        });
    let arcs_agree = graph
        .arc_positions()
        .all(|pos| next[pos as usize] == graph.next_out_arc(pos).map_or(0, |p| p as i64));

    if !(nodes_agree && arcs_agree) {
        warn!("forward-star links of the file are inconsistent, using the replayed links");
    }
}

/// A configurable reader for the **board format**.
///
/// Lines starting with the comment identifier (default: `"#"`) close the current section.
#[derive(Debug, Clone)]
pub struct BoardReader {
    comment_identifier: String,
}

impl Default for BoardReader {
    fn default() -> Self {
        Self {
            comment_identifier: "#".to_string(),
        }
    }
}

impl BoardReader {
    /// Creates a new [`BoardReader`] with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Updates the identifier used for detecting comment lines
    pub fn set_comment_identifier<S>(&mut self, c: S)
    where
        S: Into<String>,
    {
        self.comment_identifier = c.into();
    }

    /// Updates the comment identifier, consuming and returning `self` for chaining
    pub fn comment_identifier<S>(mut self, c: S) -> Self
    where
        S: Into<String>,
    {
        self.set_comment_identifier(c);
        self
    }
}

impl GraphReader<Graph> for BoardReader {
    fn try_read_graph<R: BufRead>(&self, reader: R) -> Result<Graph> {
        let mut sections = Sections::default();
        let mut current = None;

        for line in reader.lines() {
            let line = line?;
            let trimmed = line.trim_end();

            if trimmed.is_empty() || trimmed.starts_with(&self.comment_identifier) {
                current = None;
                continue;
            }

            if trimmed.starts_with('[') {
                let section = current.ok_or(io_error!(
                    ErrorKind::InvalidData,
                    "Data row outside of a section."
                ))?;
                sections.push_row(section, trimmed)?;
                continue;
            }

            if trimmed.starts_with('t') {
                let mut parts = trimmed.split_whitespace().skip(1);
                let code: char = parse_next_value!(parts, "graph kind");
                sections.kind = Some(GraphKind::from_code(code).ok_or(io_error!(
                    ErrorKind::InvalidData,
                    format!("Unknown graph kind {code}.")
                ))?);
                current = None;
                continue;
            }

            let section = trimmed.chars().next().and_then(Section::from_marker);
            raise_error_unless!(
                section.is_some() && trimmed.len() == 1,
                ErrorKind::InvalidData,
                format!("Unexpected line: {trimmed}")
            );
            current = section;
        }

        sections.into_graph()
    }
}

/// Trait for creating graphs from the **board format**.
///
/// Provides shorthand methods for reading graphs using the default [`BoardReader`] settings.
pub trait BoardRead: Sized {
    /// Tries to read a graph from a given buffered reader in **board format**
    fn try_read_board<R>(reader: R) -> Result<Self>
    where
        R: BufRead;

    /// Tries to read a graph from a file on disk in **board format**
    fn try_read_board_file<P>(path: P) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        Self::try_read_board(BufReader::new(File::open(path)?))
    }
}

impl BoardRead for Graph {
    fn try_read_board<R>(reader: R) -> Result<Self>
    where
        R: BufRead,
    {
        BoardReader::default().try_read_graph(reader)
    }
}

/// A writer for exporting graphs in the **board format**.
///
/// Sections are written in the order `t`, `N`, `B`, `A`, `c`, `u`, `f`, `x`, each preceded by
/// a comment line unless disabled. Absent vectors are skipped; a graph without nodes is written
/// as the `t`-line only.
#[derive(Debug, Clone)]
pub struct BoardWriter {
    comments: bool,
}

impl Default for BoardWriter {
    fn default() -> Self {
        Self { comments: true }
    }
}

impl BoardWriter {
    /// Creates a new [`BoardWriter`] with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables or disables the comment line in front of every block of sections
    pub fn set_comments(&mut self, comments: bool) {
        self.comments = comments;
    }

    /// Enables or disables comments, consuming and returning `self` for chaining
    pub fn comments(mut self, comments: bool) -> Self {
        self.set_comments(comments);
        self
    }

    fn write_comment<W: Write>(&self, writer: &mut W, comment: &str, first: bool) -> Result<()> {
        if !first {
            writeln!(writer)?;
        }
        if self.comments {
            writeln!(writer, "# {comment}")?;
        }
        Ok(())
    }
}

/// Writes a row of values in their shortest round-tripping representation
fn write_row<W, T>(writer: &mut W, values: impl IntoIterator<Item = T>) -> Result<()>
where
    W: Write,
    T: Debug,
{
    writeln!(writer, "[{}]", values.into_iter().map(|v| format!("{v:?}")).join(", "))
}

impl GraphWriter<Graph> for BoardWriter {
    fn try_write_graph<W: Write>(&self, graph: &Graph, mut writer: W) -> Result<()> {
        self.write_comment(&mut writer, "graph type", true)?;
        writeln!(writer, "t {}", graph.kind().code())?;
        if graph.is_empty() {
            return Ok(());
        }

        let as_link = |pos: Option<ArcPos>| pos.map_or(-1, |p| p as i64);

        self.write_comment(&mut writer, "Node data points", false)?;
        writeln!(writer, "N")?;
        write_row(&mut writer, graph.vertices().map(|u| as_link(graph.first_out_arc(u))))?;
        write_row(&mut writer, graph.vertices().map(|u| as_link(graph.last_out_arc(u))))?;

        self.write_comment(&mut writer, "External Flows", false)?;
        writeln!(writer, "B")?;
        write_row(&mut writer, graph.supplies())?;

        self.write_comment(&mut writer, "Adjacency matrix", false)?;
        if graph.number_of_arcs() > 0 {
            writeln!(writer, "A")?;
            write_row(&mut writer, graph.arcs().map(|Edge(u, _)| u + 1))?;
            write_row(&mut writer, graph.arcs().map(|Edge(_, v)| v + 1))?;
            write_row(
                &mut writer,
                graph
                    .arc_positions()
                    .map(|pos| graph.next_out_arc(pos).unwrap_or(0)),
            )?;
        }

        self.write_comment(&mut writer, "graph elements: cost, capacity, flow", false)?;
        if let Some(costs) = graph.costs() {
            writeln!(writer, "c")?;
            write_row(&mut writer, costs)?;
        }
        if let Some(capacities) = graph.capacities() {
            writeln!(writer, "u")?;
            write_row(&mut writer, capacities)?;
        }
        if graph.is_residual() {
            writeln!(writer, "f")?;
            write_row(
                &mut writer,
                graph.mirrors().iter().map(|mirror| mirror.direction.marker()),
            )?;
        } else if let Some(flows) = graph.flows() {
            writeln!(writer, "f")?;
            write_row(&mut writer, flows)?;
        }

        self.write_comment(&mut writer, "coordinates for draw", false)?;
        writeln!(writer, "x")?;
        write_row(&mut writer, graph.coordinates().iter().map(|p| p.x))?;
        write_row(&mut writer, graph.coordinates().iter().map(|p| p.y))?;

        Ok(())
    }
}

/// Trait for writing a graph to a writer in the **board format**.
///
/// Provides shorthand methods using the default [`BoardWriter`] settings.
pub trait BoardWrite {
    /// Tries to write the graph to a given writer in **board format**
    fn try_write_board<W>(&self, writer: W) -> Result<()>
    where
        W: Write;

    /// Tries to write the graph to a file in **board format**
    fn try_write_board_file<P>(&self, path: P) -> Result<()>
    where
        P: AsRef<Path>,
    {
        self.try_write_board(BufWriter::new(File::create(path)?))
    }
}

impl BoardWrite for Graph {
    fn try_write_board<W>(&self, writer: W) -> Result<()>
    where
        W: Write,
    {
        BoardWriter::default().try_write_graph(self, writer)
    }
}
