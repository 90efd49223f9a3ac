//! Outer document model.
//!
//! A document is a root node whose children are textblocks. Positions
//! follow the usual rich-text convention: every textblock contributes an
//! opening token, its text, and a closing token, so a block holding `n`
//! chars has size `n + 2`. Position `p` between two blocks sits at the
//! document level; positions inside a block's delimiters address its text.
//!
//! ```text
//!  0   1 2 3   4   5 6   7
//!  | <p> h i </p> <code> x </code> |
//! ```
//!
//! Documents are immutable; edits build a new revision sharing nothing
//! mutable with the old one.

use std::sync::Arc;

use smol_str::SmolStr;

use crate::error::EmbedError;
use crate::types::{Bias, Selection};

/// Stable identity of a block across revisions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

/// Block node types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeType {
    Paragraph,
    Heading,
    CodeBlock,
}

impl NodeType {
    pub fn name(self) -> &'static str {
        match self {
            Self::Paragraph => "paragraph",
            Self::Heading => "heading",
            Self::CodeBlock => "code_block",
        }
    }

    /// Whether the block holds raw code rather than formatted text.
    pub fn is_code(self) -> bool {
        matches!(self, Self::CodeBlock)
    }
}

/// A textblock with its inline text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node {
    id: NodeId,
    node_type: NodeType,
    text: SmolStr,
    chars: usize,
}

impl Node {
    pub fn new(id: NodeId, node_type: NodeType, text: impl Into<SmolStr>) -> Self {
        let text = text.into();
        let chars = text.chars().count();
        Self {
            id,
            node_type,
            text,
            chars,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn node_type(&self) -> NodeType {
        self.node_type
    }

    pub fn text_content(&self) -> &str {
        &self.text
    }

    /// Length of the inline content in chars.
    pub fn content_size(&self) -> usize {
        self.chars
    }

    /// Size including the opening and closing tokens.
    pub fn node_size(&self) -> usize {
        self.chars + 2
    }

    fn with_text(&self, text: String) -> Self {
        Self::new(self.id, self.node_type, text)
    }

    fn with_type(&self, node_type: NodeType) -> Self {
        Self::new(self.id, node_type, self.text.clone())
    }
}

/// A position resolved against a document.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResolvedPos {
    pub pos: usize,
    /// 0 at the document level, 1 inside a textblock.
    pub depth: u8,
    /// Containing block at depth 1; the block after `pos` at depth 0.
    pub index: usize,
    /// Offset into the parent's content.
    pub parent_offset: usize,
    /// Start of the containing block (depth 1) or `pos` itself (depth 0).
    block_start: usize,
    block_size: usize,
}

impl ResolvedPos {
    /// Whether the position is inside a textblock.
    pub fn in_textblock(&self) -> bool {
        self.depth == 1
    }

    /// Position directly before the containing block.
    pub fn before(&self) -> Option<usize> {
        self.in_textblock().then_some(self.block_start)
    }

    /// Position directly after the containing block.
    pub fn after(&self) -> Option<usize> {
        self.in_textblock()
            .then_some(self.block_start + self.block_size)
    }
}

/// An immutable document revision.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Document {
    blocks: Arc<Vec<Node>>,
    next_id: u64,
}

impl Default for Document {
    fn default() -> Self {
        Self::builder().paragraph("").build()
    }
}

impl Document {
    pub fn builder() -> DocumentBuilder {
        DocumentBuilder::default()
    }

    pub fn blocks(&self) -> &[Node] {
        &self.blocks
    }

    /// Size of the document's content (the sum of its block sizes).
    pub fn content_size(&self) -> usize {
        self.blocks.iter().map(Node::node_size).sum()
    }

    /// Start position of every block, in order.
    pub fn block_positions(&self) -> impl Iterator<Item = (usize, &Node)> {
        self.blocks.iter().scan(0, |pos, node| {
            let start = *pos;
            *pos += node.node_size();
            Some((start, node))
        })
    }

    /// Start position and node for a tracked id.
    pub fn find(&self, id: NodeId) -> Option<(usize, &Node)> {
        self.block_positions().find(|(_, node)| node.id == id)
    }

    /// Start position of the block with the given id.
    pub fn position_of(&self, id: NodeId) -> Option<usize> {
        self.find(id).map(|(pos, _)| pos)
    }

    /// Node whose content contains `pos`, if any.
    pub fn node_at(&self, pos: usize) -> Option<&Node> {
        let rp = self.resolve(pos).ok()?;
        rp.in_textblock().then(|| &self.blocks[rp.index])
    }

    pub fn resolve(&self, pos: usize) -> Result<ResolvedPos, EmbedError> {
        let size = self.content_size();
        if pos > size {
            return Err(EmbedError::PositionOutOfRange { pos, size });
        }
        for (index, (start, node)) in self.block_positions().enumerate() {
            let end = start + node.node_size();
            if pos == start {
                return Ok(ResolvedPos {
                    pos,
                    depth: 0,
                    index,
                    parent_offset: pos,
                    block_start: pos,
                    block_size: 0,
                });
            }
            if pos < end {
                return Ok(ResolvedPos {
                    pos,
                    depth: 1,
                    index,
                    parent_offset: pos - start - 1,
                    block_start: start,
                    block_size: node.node_size(),
                });
            }
        }
        Ok(ResolvedPos {
            pos,
            depth: 0,
            index: self.blocks.len(),
            parent_offset: pos,
            block_start: pos,
            block_size: 0,
        })
    }

    /// Nearest valid cursor position, searching in `bias` first and then
    /// the other way.
    ///
    /// A position already inside a textblock is its own answer. Between
    /// blocks the search lands at the start of the next textblock (forward)
    /// or the end of the previous one (backward).
    pub fn selection_near(&self, pos: usize, bias: Bias) -> Option<Selection> {
        let rp = self.resolve(pos).ok()?;
        if rp.in_textblock() {
            return Some(Selection::cursor(pos));
        }
        self.find_cursor_from(rp.index, bias).or_else(|| {
            let flipped = match bias {
                Bias::Forward => Bias::Backward,
                Bias::Backward => Bias::Forward,
            };
            self.find_cursor_from(rp.index, flipped)
        })
    }

    /// `index` is the block directly after the boundary being searched from.
    fn find_cursor_from(&self, index: usize, bias: Bias) -> Option<Selection> {
        let positions: Vec<_> = self.block_positions().collect();
        match bias {
            Bias::Forward => positions
                .get(index)
                .map(|(start, _)| Selection::cursor(start + 1)),
            Bias::Backward => index
                .checked_sub(1)
                .and_then(|i| positions.get(i))
                .map(|(start, node)| Selection::cursor(start + 1 + node.content_size())),
        }
    }

    /// Replace `from..to` (inside a single textblock) with `text`.
    pub fn replace_text(&self, from: usize, to: usize, text: &str) -> Result<Self, EmbedError> {
        if from > to {
            return Err(EmbedError::InvertedRange { from, to });
        }
        let start = self.resolve(from)?;
        let end = self.resolve(to)?;
        if !start.in_textblock() || !end.in_textblock() || start.index != end.index {
            return Err(EmbedError::CrossesBlockBoundary { from, to });
        }

        let node = &self.blocks[start.index];
        let mut chars = node.text.chars();
        let mut new_text: String = chars.by_ref().take(start.parent_offset).collect();
        new_text.push_str(text);
        new_text.extend(chars.skip(end.parent_offset - start.parent_offset));

        Ok(self.with_block(start.index, node.with_text(new_text)))
    }

    /// Insert a new block at a document-level position.
    pub fn insert_block(
        &self,
        pos: usize,
        node_type: NodeType,
        text: &str,
    ) -> Result<Self, EmbedError> {
        let rp = self.resolve(pos)?;
        if rp.in_textblock() {
            return Err(EmbedError::CrossesBlockBoundary { from: pos, to: pos });
        }
        let mut blocks = (*self.blocks).clone();
        blocks.insert(rp.index, Node::new(NodeId(self.next_id), node_type, text));
        Ok(Self {
            blocks: Arc::new(blocks),
            next_id: self.next_id + 1,
        })
    }

    /// Change the type of the block starting at `pos`, keeping its identity.
    pub fn set_block_type(&self, pos: usize, node_type: NodeType) -> Result<Self, EmbedError> {
        let rp = self.resolve(pos)?;
        if rp.in_textblock() || rp.index >= self.blocks.len() {
            return Err(EmbedError::PositionOutOfRange {
                pos,
                size: self.content_size(),
            });
        }
        Ok(self.with_block(rp.index, self.blocks[rp.index].with_type(node_type)))
    }

    /// Remove the block starting at `pos`.
    pub fn remove_block(&self, pos: usize) -> Result<Self, EmbedError> {
        let rp = self.resolve(pos)?;
        if rp.in_textblock() || rp.index >= self.blocks.len() {
            return Err(EmbedError::PositionOutOfRange {
                pos,
                size: self.content_size(),
            });
        }
        let mut blocks = (*self.blocks).clone();
        blocks.remove(rp.index);
        Ok(Self {
            blocks: Arc::new(blocks),
            next_id: self.next_id,
        })
    }

    fn with_block(&self, index: usize, node: Node) -> Self {
        let mut blocks = (*self.blocks).clone();
        blocks[index] = node;
        Self {
            blocks: Arc::new(blocks),
            next_id: self.next_id,
        }
    }
}

/// Builds a document block by block, assigning ids in order.
#[derive(Default)]
pub struct DocumentBuilder {
    blocks: Vec<Node>,
}

impl DocumentBuilder {
    pub fn block(mut self, node_type: NodeType, text: &str) -> Self {
        let id = NodeId(self.blocks.len() as u64);
        self.blocks.push(Node::new(id, node_type, text));
        self
    }

    pub fn paragraph(self, text: &str) -> Self {
        self.block(NodeType::Paragraph, text)
    }

    pub fn heading(self, text: &str) -> Self {
        self.block(NodeType::Heading, text)
    }

    pub fn code_block(self, text: &str) -> Self {
        self.block(NodeType::CodeBlock, text)
    }

    pub fn build(self) -> Document {
        let next_id = self.blocks.len() as u64;
        Document {
            blocks: Arc::new(self.blocks),
            next_id,
        }
    }
}
