//! The numbered menu loop.
//!
//! The menu only calls the partition's public operations; it never changes
//! zones or stores directly.

use std::io::{self, BufRead, Write};

use can_dht::{format_path, CanError, NodeId, Partition};
use rand::rngs::StdRng;
use tracing::error;

use crate::render::{ascii_map, MapSize, Trace};
use crate::report::status_report;

/// A menu selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuCommand {
    AddNode,
    DeleteNode,
    Put,
    Get,
    Map,
    Report,
    Quit,
    Export,
}

impl MenuCommand {
    /// Menu entries in display order.
    pub const ALL: [Self; 8] = [
        Self::AddNode,
        Self::DeleteNode,
        Self::Put,
        Self::Get,
        Self::Map,
        Self::Report,
        Self::Quit,
        Self::Export,
    ];

    pub fn from_selection(selection: &str) -> Option<Self> {
        match selection.trim() {
            "1" => Some(Self::AddNode),
            "2" => Some(Self::DeleteNode),
            "3" => Some(Self::Put),
            "4" => Some(Self::Get),
            "5" => Some(Self::Map),
            "6" => Some(Self::Report),
            "7" | "q" | "quit" => Some(Self::Quit),
            "8" => Some(Self::Export),
            _ => None,
        }
    }

    fn key(self) -> u8 {
        match self {
            Self::AddNode => 1,
            Self::DeleteNode => 2,
            Self::Put => 3,
            Self::Get => 4,
            Self::Map => 5,
            Self::Report => 6,
            Self::Quit => 7,
            Self::Export => 8,
        }
    }

    fn description(self) -> &'static str {
        match self {
            Self::AddNode => "Add node (random point)",
            Self::DeleteNode => "Delete node (by ID)",
            Self::Put => "PUT key=value",
            Self::Get => "GET key (shows lookup path)",
            Self::Map => "Show ASCII map",
            Self::Report => "Report (status + per-node stats)",
            Self::Quit => "Quit",
            Self::Export => "Export zones as JSON",
        }
    }
}

/// An interactive session over one partition.
pub struct Session<R, W> {
    can: Partition,
    rng: StdRng,
    map: MapSize,
    input: R,
    out: W,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(can: Partition, rng: StdRng, map: MapSize, input: R, out: W) -> Self {
        Self {
            can,
            rng,
            map,
            input,
            out,
        }
    }

    /// Run until Quit or end of input.
    pub fn run(&mut self) -> io::Result<()> {
        loop {
            self.print_menu()?;
            let Some(selection) = self.prompt("Select: ")? else {
                break;
            };
            match MenuCommand::from_selection(&selection) {
                Some(MenuCommand::Quit) => break,
                Some(command) => self.dispatch(command)?,
                None => writeln!(self.out, "Invalid selection.")?,
            }
        }
        writeln!(self.out, "Goodbye.")
    }

    fn print_menu(&mut self) -> io::Result<()> {
        writeln!(self.out)?;
        writeln!(self.out, "=== CAN (2D) ===")?;
        for command in MenuCommand::ALL {
            writeln!(self.out, "[{}] {}", command.key(), command.description())?;
        }
        Ok(())
    }

    /// Read one trimmed line; `None` at end of input.
    fn prompt(&mut self, label: &str) -> io::Result<Option<String>> {
        write!(self.out, "{label}")?;
        self.out.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn dispatch(&mut self, command: MenuCommand) -> io::Result<()> {
        match command {
            MenuCommand::AddNode => self.add_node(),
            MenuCommand::DeleteNode => self.delete_node(),
            MenuCommand::Put => self.put(),
            MenuCommand::Get => self.get(),
            MenuCommand::Map => {
                writeln!(self.out, "ASCII map (rows top->bottom are y=1->0):")?;
                write!(self.out, "{}", ascii_map(&self.can.snapshot(), self.map, None))?;
                writeln!(self.out, "Legend: numbers are node ID suffixes (01 = N01)")
            }
            MenuCommand::Report => write!(self.out, "{}", status_report(&self.can)),
            MenuCommand::Export => match serde_json::to_string_pretty(&self.can.snapshot()) {
                Ok(json) => writeln!(self.out, "{json}"),
                Err(e) => writeln!(self.out, "Error: {e}"),
            },
            MenuCommand::Quit => Ok(()),
        }
    }

    fn report_error(&mut self, e: &CanError) -> io::Result<()> {
        if e.is_bug() {
            error!(error = %e, "partition invariant violated");
        }
        writeln!(self.out, "Error: {e}")
    }

    fn add_node(&mut self) -> io::Result<()> {
        match self.can.add_random_node(&mut self.rng) {
            Ok(id) => writeln!(self.out, "Added node {id}. Nodes={}", self.can.len()),
            Err(e) => self.report_error(&e),
        }
    }

    fn delete_node(&mut self) -> io::Result<()> {
        let ids: Vec<String> = self.can.node_ids().iter().map(ToString::to_string).collect();
        writeln!(self.out, "Existing nodes: {}", ids.join(" "))?;
        let Some(text) = self.prompt("Enter node ID to delete (e.g., N02): ")? else {
            return Ok(());
        };
        let id: NodeId = match text.parse() {
            Ok(id) => id,
            Err(e) => return self.report_error(&e),
        };
        match self.can.delete_node(id) {
            Ok(survivor) => writeln!(
                self.out,
                "Deleted {id}; zone merged into {survivor}. Nodes={}",
                self.can.len()
            ),
            Err(e) => self.report_error(&e),
        }
    }

    fn put(&mut self) -> io::Result<()> {
        let Some(line) = self.prompt("Enter as key=value: ")? else {
            return Ok(());
        };
        let Some((key, value)) = line.split_once('=') else {
            return writeln!(self.out, "Format must be key=value");
        };
        let (key, value) = (key.trim(), value.trim());
        if key.is_empty() {
            return writeln!(self.out, "Key cannot be empty.");
        }
        let point = self.can.hash(key);
        match self.can.put(key, value) {
            Ok(owner) => writeln!(self.out, "PUT {key:?} at {point} -> owner {owner}"),
            Err(e) => self.report_error(&e),
        }
    }

    fn get(&mut self) -> io::Result<()> {
        let Some(key) = self.prompt("Key: ")? else {
            return Ok(());
        };
        if key.is_empty() {
            return writeln!(self.out, "Key cannot be empty.");
        }

        let (point, path, owner, value) = match self.can.get(&key) {
            Ok(found) => (found.point, found.path, found.owner, Some(found.value)),
            Err(CanError::KeyNotFound(_)) => match self.can.locate(&key) {
                Ok(route) => (route.point(), route.path().to_vec(), route.owner(), None),
                Err(e) => return self.report_error(&e),
            },
            Err(e) => return self.report_error(&e),
        };

        writeln!(
            self.out,
            "GET {key:?} -> {point} | path: {} | owner: {owner}",
            format_path(&path)
        )?;
        match value {
            Some(value) => writeln!(self.out, "Result: {value}")?,
            None => writeln!(self.out, "Result: NOT FOUND")?,
        }

        writeln!(self.out, "ASCII lookup view (labeled cells = nodes on path, TT = target)")?;
        let trace = Trace {
            path: &path,
            target: point,
        };
        write!(self.out, "{}", ascii_map(&self.can.snapshot(), self.map, Some(trace)))
    }
}
