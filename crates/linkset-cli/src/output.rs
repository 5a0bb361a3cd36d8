//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use serde::Serialize;

use linkset_core::filter::group_by_top_folder;
use linkset_core::{LinkItem, MergeReport, TreeNode};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Print a single link
    pub fn print_item(&self, item: &LinkItem) {
        match self.format {
            OutputFormat::Human => {
                println!("ID:      {}", item.id);
                println!("Name:    {}", item.name);
                println!("URL:     {}", item.url);
                println!("Folder:  {}", item.effective_path());
                if !item.tags.is_empty() {
                    println!("Tags:    {}", item.tags.join(", "));
                }
                if let Some(added_at) = item.added_at {
                    println!("Added:   {}", added_at.format("%Y-%m-%d %H:%M"));
                }
            }
            OutputFormat::Json => print_json(item),
            OutputFormat::Quiet => {
                println!("{}", item.id);
            }
        }
    }

    /// Print a flat list of links
    pub fn print_items(&self, items: &[&LinkItem]) {
        match self.format {
            OutputFormat::Human => {
                if items.is_empty() {
                    println!("No links found.");
                    return;
                }
                for item in items {
                    println!("{}", item_line(item));
                }
                println!("\n{} link(s)", items.len());
            }
            OutputFormat::Json => print_json(&items),
            OutputFormat::Quiet => {
                for item in items {
                    println!("{}", item.id);
                }
            }
        }
    }

    /// Print links under a heading per top-level folder
    ///
    /// JSON and quiet output stay flat.
    pub fn print_grouped(&self, items: &[&LinkItem]) {
        if self.format != OutputFormat::Human || items.is_empty() {
            return self.print_items(items);
        }
        for (folder, group) in group_by_top_folder(items) {
            println!("── {} ({}) ──", folder, group.len());
            for item in group {
                println!("{}", item_line(item));
            }
            println!();
        }
        println!("{} link(s)", items.len());
    }

    /// Print the folder tree
    pub fn print_tree(&self, root: &TreeNode) {
        match self.format {
            OutputFormat::Human => {
                if root.is_leaf() {
                    println!("No folders.");
                    return;
                }
                let mut lines = Vec::new();
                render_tree(root, "", &mut lines);
                for line in lines {
                    println!("{}", line);
                }
            }
            OutputFormat::Json => print_json(root),
            OutputFormat::Quiet => {
                for path in root.folder_paths() {
                    println!("{}", path);
                }
            }
        }
    }

    /// Print the outcome of an import or pull
    pub fn print_report(&self, source: &str, report: &MergeReport) {
        match self.format {
            OutputFormat::Human => {
                println!(
                    "✓ {}: {} added, {} already saved",
                    source, report.added, report.skipped
                );
            }
            OutputFormat::Json => println!(
                "{}",
                serde_json::json!({
                    "source": source,
                    "added": report.added,
                    "skipped": report.skipped
                })
            ),
            OutputFormat::Quiet => println!("{}", report.added),
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Print a warning to stderr (shown in every mode)
    pub fn warning(&self, message: &str) {
        eprintln!("⚠ {}", message);
    }

    /// Check if we should prompt for confirmation
    pub fn should_prompt(&self) -> bool {
        self.format == OutputFormat::Human
    }

    /// Print an informational message
    pub fn message(&self, msg: &str) {
        match self.format {
            OutputFormat::Human => println!("{}", msg),
            OutputFormat::Json => {
                println!("{}", serde_json::json!({"message": msg}));
            }
            OutputFormat::Quiet => {}
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to encode JSON: {}", e),
    }
}

fn item_line(item: &LinkItem) -> String {
    format!(
        "{} | {} | {}",
        short_id(item),
        truncate(&item.name, 35),
        truncate(&item.url, 45)
    )
}

fn short_id(item: &LinkItem) -> String {
    item.id.to_string().chars().take(8).collect()
}

/// One line per folder, children indented under their parent
fn render_tree(node: &TreeNode, indent: &str, lines: &mut Vec<String>) {
    let count = node.children.len();
    for (i, child) in node.children.values().enumerate() {
        let last = i + 1 == count;
        let branch = if last { "└── " } else { "├── " };
        lines.push(format!("{}{}{}", indent, branch, child.name));
        let next = format!("{}{}", indent, if last { "    " } else { "│   " });
        render_tree(child, &next, lines);
    }
}

/// Truncate a string to max characters, adding "..." if truncated
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
