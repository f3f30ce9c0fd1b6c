//! Text renderer: draws the chart as an indented tree with `termtree`.
//!
//! Used by the interactive binary for `show` and as the bundled export
//! backend (picture = the whole tree as UTF-8 text, document = the same text
//! split into pages separated by form feeds).

use std::fmt::Write;

use termtree::Tree;

use crate::application::export::ExportKind;
use crate::domain::{OrgNode, ViewState};
use crate::infrastructure::traits::ChartRenderer;

pub const DEFAULT_PAGE_LINES: usize = 60;
const PAGE_BREAK: char = '\u{000C}';

#[derive(Debug, Clone)]
pub struct TextChartRenderer {
    page_lines: usize,
}

impl Default for TextChartRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_LINES)
    }
}

impl TextChartRenderer {
    pub fn new(page_lines: usize) -> Self {
        Self { page_lines }
    }

    /// Tree of node labels. Children of collapsed nodes are left out.
    pub fn to_tree(&self, node: &OrgNode, view: &ViewState) -> Tree<String> {
        let tree = Tree::new(node_label(node, view));
        if !node.expanded {
            return tree;
        }
        tree.with_leaves(node.children.iter().map(|child| self.to_tree(child, view)))
    }

    pub fn render_text(&self, root: &OrgNode, view: &ViewState) -> String {
        self.to_tree(root, view).to_string()
    }
}

impl ChartRenderer for TextChartRenderer {
    fn rasterize(&self, root: &OrgNode, view: &ViewState) -> Result<Vec<u8>, String> {
        Ok(self.render_text(root, view).into_bytes())
    }

    fn paginate(&self, root: &OrgNode, view: &ViewState) -> Result<Vec<u8>, String> {
        if self.page_lines == 0 {
            return Err("page size must be at least one line".to_string());
        }
        let text = self.render_text(root, view);
        let lines: Vec<&str> = text.lines().collect();
        let pages: Vec<&[&str]> = lines.chunks(self.page_lines).collect();
        let total = pages.len();

        let mut out = String::new();
        for (i, page) in pages.iter().enumerate() {
            if i > 0 {
                out.push(PAGE_BREAK);
            }
            let _ = write!(out, "{} - page {}/{}\n\n", root.title, i + 1, total);
            for line in page.iter() {
                out.push_str(line);
                out.push('\n');
            }
        }
        Ok(out.into_bytes())
    }

    fn extension(&self, _kind: ExportKind) -> &'static str {
        "txt"
    }
}

fn node_label(node: &OrgNode, view: &ViewState) -> String {
    let mut label = String::new();
    if view.controls_visible && !node.children.is_empty() {
        label.push_str(if node.expanded { "[-] " } else { "[+] " });
    }
    label.push_str(&node.title);

    if view.show_images {
        match node.image_url.as_deref().filter(|url| !url.is_empty()) {
            Some(url) if url.starts_with("data:") => label.push_str(" [embedded image]"),
            Some(url) => {
                let _ = write!(label, " [image: {url}]");
            }
            None => label.push_str(" [no image]"),
        }
    }
    if let Some(description) = node.description.as_deref().filter(|d| !d.is_empty()) {
        let _ = write!(label, " ({description})");
    }
    if let Some(stats) = node.stats.as_deref().filter(|s| !s.is_empty()) {
        let _ = write!(label, " | {stats}");
    }
    if view.controls_visible {
        let _ = write!(label, "  #{}", node.id);
    }
    label
}
