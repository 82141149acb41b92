use std::fmt::Display;

/// One path segment of a method's route tree.
///
/// Only the last node of a registered pattern carries that pattern; every
/// node above it has an empty `pattern`. An empty `pattern` therefore means
/// "valid prefix, but nothing registered here".
#[derive(Debug, Default)]
pub struct Node {
    pattern: String,
    part: String,
    children: Vec<Node>,
    is_wild: bool,
}

impl Node {
    pub fn new() -> Self {
        Self::default()
    }

    fn new_child(part: &str) -> Self {
        Self {
            pattern: String::new(),
            part: part.to_owned(),
            children: vec![],
            is_wild: wild_kind(part).is_some(),
        }
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Inserts `pattern` below this node, walking `parts` from `height`.
    ///
    /// Returns the pattern previously stored at the terminal node if it was
    /// a different one.
    pub fn insert(&mut self, pattern: &str, parts: &[&str], height: usize) -> Option<String> {
        if parts.len() == height {
            if self.pattern == pattern {
                return None;
            }
            let old = std::mem::replace(&mut self.pattern, pattern.to_owned());
            return (!old.is_empty()).then_some(old);
        }

        let part = parts[height];
        let idx = match self.match_child(part) {
            Some(idx) => idx,
            None => {
                self.children.push(Node::new_child(part));
                self.children.len() - 1
            }
        };
        self.children[idx].insert(pattern, parts, height + 1)
    }

    /// Finds the node of the registered pattern matching `parts`.
    ///
    /// Backtracks: if the literal branch dead-ends, the parameter and
    /// catch-all branches at the same level are tried next.
    pub fn search(&self, parts: &[&str], height: usize) -> Option<&Node> {
        if parts.len() == height || self.part.starts_with('*') {
            if self.pattern.is_empty() {
                return None;
            }
            return Some(self);
        }

        let part = parts[height];
        self.match_children(part)
            .into_iter()
            .find_map(|child| child.search(parts, height + 1))
    }

    /// Collects every node below (and including) this one that ends a pattern.
    pub fn travel<'a>(&'a self, list: &mut Vec<&'a Node>) {
        if !self.pattern.is_empty() {
            list.push(self);
        }
        for child in &self.children {
            child.travel(list);
        }
    }

    // A literal never merges into a parameter node and vice versa;
    // two parameters of the same kind share a node.
    fn match_child(&self, part: &str) -> Option<usize> {
        let kind = wild_kind(part);
        self.children.iter().position(|child| {
            child.part == part || (kind.is_some() && wild_kind(&child.part) == kind)
        })
    }

    // Literal children first, then `:name`, then `*name`.
    fn match_children(&self, part: &str) -> Vec<&Node> {
        let literal = self
            .children
            .iter()
            .filter(|child| !child.is_wild && child.part == part);
        let param = self
            .children
            .iter()
            .filter(|child| wild_kind(&child.part) == Some(':'));
        let catch_all = self
            .children
            .iter()
            .filter(|child| wild_kind(&child.part) == Some('*'));
        literal.chain(param).chain(catch_all).collect()
    }
}

impl Display for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "node{{pattern={}, part={}, is_wild={}}}",
            self.pattern, self.part, self.is_wild
        )
    }
}

fn wild_kind(part: &str) -> Option<char> {
    match part.chars().next() {
        Some(c @ (':' | '*')) => Some(c),
        _ => None,
    }
}
