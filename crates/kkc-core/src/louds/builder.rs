use std::collections::{BTreeMap, VecDeque};

use crate::succinct::BitVector;

use super::{LoudsTrie, TermIdTrie, ROOT_LABEL};

/// Output of [`LoudsBuilder::build`].
pub struct BuiltTrie {
    pub trie: TermIdTrie,
    /// Node id reached by each inserted key.
    pub nodes: BTreeMap<String, usize>,
}

/// Offline builder: lays out a key set as a LOUDS trie in breadth-first order.
#[derive(Default)]
pub struct LoudsBuilder {
    keys: Vec<Vec<char>>,
}

impl LoudsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: &str) {
        self.keys.push(key.chars().collect());
    }

    pub fn extend<I, S>(&mut self, keys: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for key in keys {
            self.insert(key.as_ref());
        }
    }

    pub fn build(mut self) -> BuiltTrie {
        self.keys.sort();
        self.keys.dedup();
        let keys = self.keys;

        let mut structure = vec![true, false];
        let mut labels = vec![ROOT_LABEL];
        let mut terminal = Vec::new();
        let mut nodes = BTreeMap::new();

        // Every queued node is the range of sorted keys sharing its path.
        let mut queue: VecDeque<(usize, usize, usize)> = VecDeque::new();
        queue.push_back((0, 0, keys.len()));

        while let Some((depth, lo, hi)) = queue.pop_front() {
            let node_id = terminal.len();
            let mut first = lo;
            let is_terminal = lo < hi && keys[lo].len() == depth;
            if is_terminal {
                nodes.insert(keys[lo].iter().collect::<String>(), node_id);
                first += 1;
            }
            terminal.push(is_terminal);

            let mut i = first;
            while i < hi {
                let label = keys[i][depth];
                let mut j = i + 1;
                while j < hi && keys[j][depth] == label {
                    j += 1;
                }
                structure.push(true);
                labels.push(label);
                queue.push_back((depth + 1, i, j));
                i = j;
            }
            structure.push(false);
        }

        let trie = LoudsTrie::from_parts(BitVector::from_bits(structure), labels);
        BuiltTrie {
            trie: TermIdTrie::from_parts(trie, BitVector::from_bits(terminal)),
            nodes,
        }
    }
}
