#[cfg(feature = "serialize")]
use serde::Serialize;

/// Snapshot of a single node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(Serialize))]
pub struct NodeStats {
    pub capacity: usize,
    pub used: usize,
}

/// Snapshot of a whole arena, summed across the chain.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(Serialize))]
pub struct ArenaStats {
    pub nodes: usize,
    pub capacity: usize,
    pub used: usize,
}

impl ArenaStats {
    /// Bytes not handed out, including space abandoned at the end of exhausted nodes.
    ///
    /// 0 if `used` exceeds `capacity`, which only a hand-built value can have.
    pub fn unused(&self) -> usize {
        self.capacity.saturating_sub(self.used)
    }
}

impl FromIterator<NodeStats> for ArenaStats {
    fn from_iter<I: IntoIterator<Item = NodeStats>>(iter: I) -> Self {
        iter.into_iter().fold(Self::default(), |mut stats, node| {
            stats.nodes += 1;
            stats.capacity += node.capacity;
            stats.used += node.used;
            stats
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{ArenaStats, NodeStats};

    #[test]
    fn sum() {
        let nodes = [NodeStats { capacity: 100, used: 10 }, NodeStats { capacity: 50, used: 50 }];
        let stats: ArenaStats = nodes.into_iter().collect();
        assert_eq!(stats, ArenaStats { nodes: 2, capacity: 150, used: 60 });
        assert_eq!(stats.unused(), 90);
    }

    #[test]
    fn unused_saturates() {
        let stats = ArenaStats { nodes: 1, capacity: 10, used: 20 };
        assert_eq!(stats.unused(), 0);
    }

    #[test]
    fn empty() {
        let stats: ArenaStats = std::iter::empty().collect();
        assert_eq!(stats, ArenaStats::default());
    }

    #[cfg(feature = "serialize")]
    #[test]
    fn serialize() {
        let stats = ArenaStats { nodes: 1, capacity: 65536, used: 10 };
        assert_eq!(
            serde_json::to_string(&stats).unwrap(),
            r#"{"nodes":1,"capacity":65536,"used":10}"#
        );
    }
}
