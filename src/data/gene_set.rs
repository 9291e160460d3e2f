use std::collections::HashSet;

/// A named set of gene identifiers. Members are unique and keep their first-seen order.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneSet {
    id: String,
    genes: Vec<String>,
}

impl GeneSet {
    pub fn new<I, S>(id: impl Into<String>, genes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        let genes: Vec<String> = genes
            .into_iter()
            .map(Into::into)
            .filter(|g: &String| seen.insert(g.clone()))
            .collect();

        GeneSet {
            id: id.into(),
            genes,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn genes(&self) -> &[String] {
        &self.genes
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }
}

/// Gene sets in file order.
#[derive(Debug, Clone, Default)]
pub struct GeneSetCollection {
    sets: Vec<GeneSet>,
}

impl GeneSetCollection {
    pub fn new(sets: Vec<GeneSet>) -> Self {
        GeneSetCollection { sets }
    }

    pub fn push(&mut self, set: GeneSet) {
        self.sets.push(set);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, GeneSet> {
        self.sets.iter()
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }
}

impl FromIterator<GeneSet> for GeneSetCollection {
    fn from_iter<I: IntoIterator<Item = GeneSet>>(iter: I) -> Self {
        GeneSetCollection {
            sets: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a GeneSetCollection {
    type Item = &'a GeneSet;
    type IntoIter = std::slice::Iter<'a, GeneSet>;

    fn into_iter(self) -> Self::IntoIter {
        self.sets.iter()
    }
}
