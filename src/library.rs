use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use log::debug;

// @module: Video library model and folder organization

/// A single discovered video file
#[derive(Debug, Clone, PartialEq)]
pub struct MediaEntry {
    // @field: Display name (file name)
    pub name: String,

    // @field: Absolute path of the video file
    pub path: PathBuf,

    // @field: Duration in milliseconds (0 when unknown)
    pub duration_ms: u64,

    // @field: Parent directory path, empty when the file has no parent
    pub folder_path: PathBuf,
}

impl MediaEntry {
    /// Create an entry, deriving the parent directory from the path
    pub fn new<P: Into<PathBuf>>(name: &str, path: P, duration_ms: u64) -> Self {
        let path = path.into();
        let folder_path = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        MediaEntry {
            name: name.to_string(),
            path,
            duration_ms,
            folder_path,
        }
    }
}

/// In-memory tree node representing a directory with its videos and subdirectories
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DirectoryNode {
    /// Display name of the directory
    pub name: String,

    /// Absolute path of the directory
    pub path: PathBuf,

    /// Videos directly in this directory, ordered by lowercase name
    pub videos: Vec<MediaEntry>,

    /// Child directories, ordered by lowercase name
    pub subdirs: Vec<DirectoryNode>,
}

impl DirectoryNode {
    /// Create an empty node for the given path
    pub fn new<P: Into<PathBuf>>(name: &str, path: P) -> Self {
        DirectoryNode {
            name: name.to_string(),
            path: path.into(),
            videos: Vec::new(),
            subdirs: Vec::new(),
        }
    }

    /// Total number of videos in this node and all descendants
    pub fn total_videos(&self) -> usize {
        self.videos.len() + self.subdirs.iter().map(DirectoryNode::total_videos).sum::<usize>()
    }

    /// Find a descendant node by its directory path
    pub fn find(&self, path: &Path) -> Option<&DirectoryNode> {
        if self.path == path {
            return Some(self);
        }
        self.subdirs.iter().find_map(|child| child.find(path))
    }

    fn sort_children(&mut self) {
        self.videos.sort_by_key(|v| v.name.to_lowercase());
        self.subdirs.sort_by_key(|d| d.name.to_lowercase());
        for child in &mut self.subdirs {
            child.sort_children();
        }
    }
}

/// Build the directory tree from a flat list of discovered entries.
///
/// Entries are grouped by parent directory into lazily created nodes; each
/// created node is then linked under the node matching its own parent path,
/// falling back to the root when no such node was created. Entries with an
/// empty parent path are dropped from the tree.
pub fn organize_folders(entries: &[MediaEntry]) -> DirectoryNode {
    let mut root = DirectoryNode::new("Root", "/");

    // Group videos by their parent directory
    let mut groups: BTreeMap<PathBuf, Vec<MediaEntry>> = BTreeMap::new();
    let mut dropped = 0usize;
    for entry in entries {
        if entry.folder_path.as_os_str().is_empty() {
            dropped += 1;
            continue;
        }
        groups
            .entry(entry.folder_path.clone())
            .or_default()
            .push(entry.clone());
    }

    if dropped > 0 {
        debug!("Dropped {} entries without a parent directory", dropped);
    }

    // Decide where each created node attaches: under the node for its own
    // parent path when one was created, otherwise directly under the root
    let mut children: BTreeMap<PathBuf, Vec<PathBuf>> = BTreeMap::new();
    let mut root_children: Vec<PathBuf> = Vec::new();
    for folder_path in groups.keys() {
        match folder_path.parent() {
            Some(parent) if groups.contains_key(parent) => {
                children
                    .entry(parent.to_path_buf())
                    .or_default()
                    .push(folder_path.clone());
            }
            _ => root_children.push(folder_path.clone()),
        }
    }

    for folder_path in root_children {
        let node = build_node(&folder_path, &mut groups, &children);
        root.subdirs.push(node);
    }

    root.sort_children();
    root
}

fn build_node(
    path: &Path,
    groups: &mut BTreeMap<PathBuf, Vec<MediaEntry>>,
    children: &BTreeMap<PathBuf, Vec<PathBuf>>,
) -> DirectoryNode {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string());

    let mut node = DirectoryNode::new(&name, path);
    node.videos = groups.remove(path).unwrap_or_default();

    if let Some(child_paths) = children.get(path) {
        for child_path in child_paths {
            node.subdirs.push(build_node(child_path, groups, children));
        }
    }

    node
}

/// One row in a gallery listing
#[derive(Debug, PartialEq)]
pub enum GalleryItem<'a> {
    /// Navigate up one level (only present below the root)
    Back,
    /// A child directory
    Folder(&'a DirectoryNode),
    /// A video in the current directory
    Video(&'a MediaEntry),
}

/// Stack-based navigation over a built directory tree
pub struct GalleryBrowser<'a> {
    root: &'a DirectoryNode,
    stack: Vec<&'a DirectoryNode>,
}

impl<'a> GalleryBrowser<'a> {
    /// Create a browser positioned at the root of the tree
    pub fn new(root: &'a DirectoryNode) -> Self {
        GalleryBrowser {
            root,
            stack: Vec::new(),
        }
    }

    /// The directory currently being displayed
    pub fn current(&self) -> &'a DirectoryNode {
        self.stack.last().copied().unwrap_or(self.root)
    }

    /// True when positioned at the root
    pub fn at_root(&self) -> bool {
        self.stack.is_empty()
    }

    /// Title to display for the current position
    pub fn title(&self) -> &str {
        if self.at_root() {
            "Plus Play"
        } else {
            &self.current().name
        }
    }

    /// Enter a child directory by name; returns false when no such child exists
    pub fn enter(&mut self, name: &str) -> bool {
        let current = self.current();
        match current.subdirs.iter().find(|d| d.name == name) {
            Some(child) => {
                self.stack.push(child);
                true
            }
            None => false,
        }
    }

    /// Pop one level off the folder stack; returns false when already at root
    pub fn back(&mut self) -> bool {
        self.stack.pop().is_some()
    }

    /// Listing for the current directory: a back item when below the root,
    /// then subdirectories, then videos
    pub fn items(&self) -> Vec<GalleryItem<'a>> {
        let current = self.current();
        let mut items = Vec::with_capacity(
            usize::from(!self.at_root()) + current.subdirs.len() + current.videos.len(),
        );

        if !self.at_root() {
            items.push(GalleryItem::Back);
        }

        for folder in &current.subdirs {
            items.push(GalleryItem::Folder(folder));
        }

        for video in &current.videos {
            items.push(GalleryItem::Video(video));
        }

        items
    }
}
