//! Pass-by-pass record of a Louvain run.
//!
//! Level 0 groups the original nodes. Every later level groups the
//! communities of the level below it: member `k` of a level-`l` community is
//! community `k` of level `l - 1`.

/// A community of one pass.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Community {
    /// Node indices of the pass's graph, ascending once the pass is recorded.
    pub members: Vec<usize>,
    /// Weight of edges inside the community, each counted from both ends,
    /// plus self-loops.
    pub internal_weight: f64,
    /// Sum of the weighted degrees of the members.
    pub total_weight: f64,
}

impl Community {
    pub(crate) fn singleton(node: usize, self_loop: f64, degree: f64) -> Self {
        Self {
            members: vec![node],
            internal_weight: self_loop,
            total_weight: degree,
        }
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// True if the community has no member.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// `weight` is the edge weight between `node` and the other members.
    pub(crate) fn remove_node(&mut self, node: usize, weight: f64, self_loop: f64, degree: f64) {
        self.members.retain(|&m| m != node);
        self.internal_weight -= 2.0 * weight + self_loop;
        self.total_weight -= degree;
    }

    pub(crate) fn insert_node(&mut self, node: usize, weight: f64, self_loop: f64, degree: f64) {
        self.members.push(node);
        self.internal_weight += 2.0 * weight + self_loop;
        self.total_weight += degree;
    }

    /// Modularity change from moving a detached node into this community.
    ///
    /// ```text
    /// ΔQ = [(in + 2w)/m − ((tot + k)/m)²] − [in/m − (tot/m)² − (k/m)²]
    /// ```
    ///
    /// `m` is the sum of all weighted degrees.
    pub(crate) fn gain(&self, weight: f64, degree: f64, m: f64) -> f64 {
        let inside = self.internal_weight;
        let total = self.total_weight;
        let after = (inside + 2.0 * weight) / m - ((total + degree) / m).powi(2);
        let before = inside / m - (total / m).powi(2) - (degree / m).powi(2);
        after - before
    }

    /// This community's share of the modularity.
    pub(crate) fn modularity(&self, m: f64) -> f64 {
        self.internal_weight / m - (self.total_weight / m).powi(2)
    }
}

/// Stack of per-pass community arrays.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Dendrogram {
    n_nodes: usize,
    levels: Vec<Vec<Community>>,
    modularity: Vec<f64>,
}

impl Dendrogram {
    /// Empty dendrogram over `n_nodes` original nodes.
    pub fn new(n_nodes: usize) -> Self {
        Self {
            n_nodes,
            levels: Vec::new(),
            modularity: Vec::new(),
        }
    }

    pub(crate) fn push_level(&mut self, communities: Vec<Community>, modularity: f64) {
        self.levels.push(communities);
        self.modularity.push(modularity);
    }

    /// Number of original nodes.
    pub fn n_nodes(&self) -> usize {
        self.n_nodes
    }

    /// Number of recorded passes.
    pub fn n_levels(&self) -> usize {
        self.levels.len()
    }

    /// Communities found by pass `level`.
    pub fn level(&self, level: usize) -> Option<&[Community]> {
        self.levels.get(level).map(Vec::as_slice)
    }

    /// Modularity of the last pass; 0 if nothing ran.
    pub fn modularity(&self) -> f64 {
        self.modularity.last().copied().unwrap_or(0.0)
    }

    /// Modularity after each pass.
    pub fn modularity_history(&self) -> &[f64] {
        &self.modularity
    }

    /// Flat clusters of original node indices from the last pass.
    ///
    /// Without any pass every node is its own cluster.
    pub fn clusters(&self) -> Vec<Vec<usize>> {
        match self.levels.len() {
            0 => (0..self.n_nodes).map(|i| vec![i]).collect(),
            n => self.clusters_at(n - 1).unwrap_or_default(),
        }
    }

    /// Flat clusters of original node indices after pass `level`.
    pub fn clusters_at(&self, level: usize) -> Option<Vec<Vec<usize>>> {
        let communities = self.levels.get(level)?;
        Some(
            (0..communities.len())
                .map(|c| {
                    let mut nodes = Vec::new();
                    self.expand(level, c, &mut nodes);
                    nodes.sort_unstable();
                    nodes
                })
                .collect(),
        )
    }

    fn expand(&self, level: usize, community: usize, out: &mut Vec<usize>) {
        let members = &self.levels[level][community].members;
        if level == 0 {
            out.extend_from_slice(members);
        } else {
            for &m in members {
                self.expand(level - 1, m, out);
            }
        }
    }

    /// Cluster id of every original node, following [`Dendrogram::clusters`].
    pub fn labels(&self) -> Vec<usize> {
        let mut labels = vec![0; self.n_nodes];
        for (id, cluster) in self.clusters().iter().enumerate() {
            for &node in cluster {
                labels[node] = id;
            }
        }
        labels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn community(members: &[usize]) -> Community {
        Community {
            members: members.to_vec(),
            internal_weight: 0.0,
            total_weight: 0.0,
        }
    }

    #[test]
    fn test_expand_through_levels() {
        let mut d = Dendrogram::new(5);
        d.push_level(
            vec![community(&[0, 3]), community(&[1]), community(&[2, 4])],
            0.1,
        );
        d.push_level(vec![community(&[0, 2]), community(&[1])], 0.3);

        assert_eq!(d.n_levels(), 2);
        assert_eq!(d.clusters(), vec![vec![0, 2, 3, 4], vec![1]]);
        assert_eq!(
            d.clusters_at(0),
            Some(vec![vec![0, 3], vec![1], vec![2, 4]])
        );
        assert!(d.clusters_at(2).is_none());
        assert_eq!(d.level(0).map(<[Community]>::len), Some(3));
        assert_eq!(d.level(0).unwrap()[2], community(&[2, 4]));
        assert_eq!(d.level(1).unwrap()[0].members, vec![0, 2]);
        assert!(d.level(2).is_none());
        assert_eq!(d.labels(), vec![0, 1, 0, 0, 0]);
        assert_eq!(d.modularity(), 0.3);
        assert_eq!(d.modularity_history(), &[0.1, 0.3]);
    }

    #[test]
    fn test_no_pass() {
        let d = Dendrogram::new(3);
        assert_eq!(d.clusters(), vec![vec![0], vec![1], vec![2]]);
        assert_eq!(d.modularity(), 0.0);
        assert!(Dendrogram::new(0).clusters().is_empty());
    }

    #[test]
    fn test_remove_insert_balance() {
        let mut c = Community::singleton(0, 0.5, 3.0);
        c.insert_node(1, 2.0, 0.0, 4.0);
        assert_eq!(c.internal_weight, 4.5);
        assert_eq!(c.total_weight, 7.0);
        c.remove_node(1, 2.0, 0.0, 4.0);
        assert_eq!(c.members, vec![0]);
        assert_eq!(c.internal_weight, 0.5);
        assert_eq!(c.total_weight, 3.0);
    }
}
