//! LCS sequence alignment.
//!
//! * time: `O(NM)` on the affix-trimmed middle
//! * space: `O(NM)` worst case, sparse in practice
use std::collections::BTreeMap;
use std::ops::Range;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The kind of edit an [`Opcode`] describes.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpcodeKind {
    /// The ranges hold equal elements.
    Equal,

    /// The old range has no counterpart in the new sequence.
    Delete,

    /// The new range has no counterpart in the old sequence.
    Insert,

    /// The old range was rewritten into the new range. The ranges may have
    /// different lengths.
    Replace,
}

/// One step of an alignment between two sequences.
///
/// Opcodes are emitted in order and tile both sequences completely: the
/// `old_range`-s concatenate to `0..old.len()` and the `new_range`-s to
/// `0..new.len()`. `Delete` carries an empty `new_range` and `Insert` an empty
/// `old_range`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opcode {
    pub kind: OpcodeKind,
    pub old_range: Range<usize>,
    pub new_range: Range<usize>,
}

impl Opcode {
    fn new(kind: OpcodeKind, old_range: Range<usize>, new_range: Range<usize>) -> Self {
        Opcode {
            kind,
            old_range,
            new_range,
        }
    }
}

/// A maximal run of matching elements, in full-sequence indices.
struct Block {
    old_start: usize,
    new_start: usize,
    len: usize,
}

/// Aligns two sequences into a minimal ordered list of [`Opcode`]-s.
///
/// Equal runs are maximal, neighbouring opcodes never share a kind, and a
/// deletion directly followed by an insertion is represented as a single
/// `Replace`. The same pair of inputs always produces the same alignment;
/// ties in the underlying LCS walk are broken towards consuming the old
/// sequence first.
#[must_use]
pub fn align<T: PartialEq>(old: &[T], new: &[T]) -> Vec<Opcode> {
    let prefix_len = common_prefix_len(old, new);
    let suffix_len = common_suffix_len(&old[prefix_len..], &new[prefix_len..]);

    let trimmed_old = &old[prefix_len..old.len() - suffix_len];
    let trimmed_new = &new[prefix_len..new.len() - suffix_len];

    let mut blocks = Vec::new();
    if prefix_len > 0 {
        blocks.push(Block {
            old_start: 0,
            new_start: 0,
            len: prefix_len,
        });
    }

    collect_middle_blocks(trimmed_old, trimmed_new, prefix_len, &mut blocks);

    if suffix_len > 0 {
        blocks.push(Block {
            old_start: old.len() - suffix_len,
            new_start: new.len() - suffix_len,
            len: suffix_len,
        });
    }

    // zero-length sentinel so the trailing gap is flushed like any other
    blocks.push(Block {
        old_start: old.len(),
        new_start: new.len(),
        len: 0,
    });

    opcodes_between_blocks(&blocks)
}

/// Walks the LCS table over the affix-trimmed middle and records every run of
/// matches as a block, offset back into full-sequence indices.
fn collect_middle_blocks<T: PartialEq>(
    trimmed_old: &[T],
    trimmed_new: &[T],
    offset: usize,
    blocks: &mut Vec<Block>,
) {
    let table = make_table(trimmed_old, trimmed_new);

    let mut old_idx = 0;
    let mut new_idx = 0;

    while old_idx < trimmed_old.len() && new_idx < trimmed_new.len() {
        if trimmed_new[new_idx] == trimmed_old[old_idx] {
            match blocks.last_mut() {
                Some(block)
                    if block.old_start + block.len == offset + old_idx
                        && block.new_start + block.len == offset + new_idx =>
                {
                    block.len += 1;
                }
                _ => blocks.push(Block {
                    old_start: offset + old_idx,
                    new_start: offset + new_idx,
                    len: 1,
                }),
            }
            old_idx += 1;
            new_idx += 1;
        } else if table.get(&(new_idx, old_idx + 1)).unwrap_or(&0)
            >= table.get(&(new_idx + 1, old_idx)).unwrap_or(&0)
        {
            old_idx += 1;
        } else {
            new_idx += 1;
        }
    }
}

/// Sparse longest-common-subsequence length table keyed by `(new_idx, old_idx)`.
/// Adapted from <https://github.com/mitsuhiko/similar>.
fn make_table<T: PartialEq>(old: &[T], new: &[T]) -> BTreeMap<(usize, usize), u32> {
    let mut table = BTreeMap::new();

    for i in (0..new.len()).rev() {
        for j in (0..old.len()).rev() {
            let val = if new[i] == old[j] {
                table.get(&(i + 1, j + 1)).unwrap_or(&0) + 1
            } else {
                *table
                    .get(&(i + 1, j))
                    .unwrap_or(&0)
                    .max(table.get(&(i, j + 1)).unwrap_or(&0))
            };
            if val > 0 {
                table.insert((i, j), val);
            }
        }
    }

    table
}

/// Turns the gap before each block into a single edit opcode and each block
/// into an `Equal` opcode.
fn opcodes_between_blocks(blocks: &[Block]) -> Vec<Opcode> {
    let mut result = Vec::new();
    let mut old_cursor = 0;
    let mut new_cursor = 0;

    for block in blocks {
        let kind = match (old_cursor < block.old_start, new_cursor < block.new_start) {
            (true, true) => Some(OpcodeKind::Replace),
            (true, false) => Some(OpcodeKind::Delete),
            (false, true) => Some(OpcodeKind::Insert),
            (false, false) => None,
        };

        if let Some(kind) = kind {
            result.push(Opcode::new(
                kind,
                old_cursor..block.old_start,
                new_cursor..block.new_start,
            ));
        }

        if block.len > 0 {
            result.push(Opcode::new(
                OpcodeKind::Equal,
                block.old_start..block.old_start + block.len,
                block.new_start..block.new_start + block.len,
            ));
        }

        old_cursor = block.old_start + block.len;
        new_cursor = block.new_start + block.len;
    }

    result
}

fn common_prefix_len<T: PartialEq>(old: &[T], new: &[T]) -> usize {
    old.iter().zip(new).take_while(|(a, b)| a == b).count()
}

fn common_suffix_len<T: PartialEq>(old: &[T], new: &[T]) -> usize {
    old.iter()
        .rev()
        .zip(new.iter().rev())
        .take_while(|(a, b)| a == b)
        .count()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn opcode(kind: OpcodeKind, old_range: Range<usize>, new_range: Range<usize>) -> Opcode {
        Opcode::new(kind, old_range, new_range)
    }

    /// Checks the tiling contract: opcodes cover both sequences in order and
    /// each kind consumes the right sides.
    fn assert_tiles(old_len: usize, new_len: usize, opcodes: &[Opcode]) {
        let mut old_cursor = 0;
        let mut new_cursor = 0;

        for op in opcodes {
            assert_eq!(op.old_range.start, old_cursor);
            assert_eq!(op.new_range.start, new_cursor);

            match op.kind {
                OpcodeKind::Equal => {
                    assert_eq!(op.old_range.len(), op.new_range.len());
                    assert!(!op.old_range.is_empty());
                }
                OpcodeKind::Delete => {
                    assert!(!op.old_range.is_empty());
                    assert!(op.new_range.is_empty());
                }
                OpcodeKind::Insert => {
                    assert!(op.old_range.is_empty());
                    assert!(!op.new_range.is_empty());
                }
                OpcodeKind::Replace => {
                    assert!(!op.old_range.is_empty());
                    assert!(!op.new_range.is_empty());
                }
            }

            old_cursor = op.old_range.end;
            new_cursor = op.new_range.end;
        }

        assert_eq!(old_cursor, old_len);
        assert_eq!(new_cursor, new_len);
    }

    #[test]
    fn test_empty() {
        assert_eq!(align::<u32>(&[], &[]), vec![]);
    }

    #[test]
    fn test_identical() {
        assert_eq!(
            align(&[1, 2, 3], &[1, 2, 3]),
            vec![opcode(OpcodeKind::Equal, 0..3, 0..3)]
        );
    }

    #[test]
    fn test_insert_only() {
        assert_eq!(
            align::<u32>(&[], &[1, 2]),
            vec![opcode(OpcodeKind::Insert, 0..0, 0..2)]
        );

        assert_eq!(
            align(&[1, 4], &[1, 2, 3, 4]),
            vec![
                opcode(OpcodeKind::Equal, 0..1, 0..1),
                opcode(OpcodeKind::Insert, 1..1, 1..3),
                opcode(OpcodeKind::Equal, 1..2, 3..4),
            ]
        );
    }

    #[test]
    fn test_delete_only() {
        assert_eq!(
            align::<u32>(&[1, 2], &[]),
            vec![opcode(OpcodeKind::Delete, 0..2, 0..0)]
        );

        assert_eq!(
            align(&[1, 2, 3, 4], &[1, 4]),
            vec![
                opcode(OpcodeKind::Equal, 0..1, 0..1),
                opcode(OpcodeKind::Delete, 1..3, 1..1),
                opcode(OpcodeKind::Equal, 3..4, 1..2),
            ]
        );
    }

    #[test]
    fn test_replace() {
        assert_eq!(
            align(&["a", "x", "c"], &["a", "y", "c"]),
            vec![
                opcode(OpcodeKind::Equal, 0..1, 0..1),
                opcode(OpcodeKind::Replace, 1..2, 1..2),
                opcode(OpcodeKind::Equal, 2..3, 2..3),
            ]
        );
    }

    #[test]
    fn test_uneven_replace_is_single_opcode() {
        // a deletion and an insertion meeting in the same gap fuse
        assert_eq!(
            align(&[1, 2, 3, 4], &[1, 5, 4]),
            vec![
                opcode(OpcodeKind::Equal, 0..1, 0..1),
                opcode(OpcodeKind::Replace, 1..3, 1..2),
                opcode(OpcodeKind::Equal, 3..4, 2..3),
            ]
        );
    }

    #[test]
    fn test_delete_wins_ties() {
        assert_eq!(
            align(&[1, 2], &[2, 1]),
            vec![
                opcode(OpcodeKind::Delete, 0..1, 0..0),
                opcode(OpcodeKind::Equal, 1..2, 0..1),
                opcode(OpcodeKind::Insert, 2..2, 1..2),
            ]
        );
    }

    #[test]
    fn test_no_common_elements() {
        assert_eq!(
            align(&[1, 2], &[3, 4, 5]),
            vec![opcode(OpcodeKind::Replace, 0..2, 0..3)]
        );
    }

    #[test]
    fn test_tiling_holds_on_scattered_matches() {
        let old = [1, 9, 2, 3, 8, 4];
        let new = [5, 1, 2, 6, 4, 7];

        let opcodes = align(&old, &new);

        assert_tiles(old.len(), new.len(), &opcodes);
        for window in opcodes.windows(2) {
            assert_ne!(window[0].kind, window[1].kind);
        }
    }

    #[test]
    fn test_table() {
        let table = make_table(&[2, 3], &[0, 1, 2]);
        let expected = {
            let mut m = BTreeMap::new();
            m.insert((0, 0), 1);
            m.insert((1, 0), 1);
            m.insert((2, 0), 1);
            m
        };
        assert_eq!(table, expected);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_opcodes_serialize() {
        let opcodes = align(&[1, 2], &[1, 3]);

        let yaml = serde_yaml::to_string(&opcodes).expect("Failed to serialize the opcodes");

        assert!(yaml.contains("Equal"));
        assert!(yaml.contains("Replace"));
    }
}
