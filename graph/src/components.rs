use std::collections::{HashMap, VecDeque};

use lexigraph_vecstore::SimilarityEdge;

/// Connected components of the graph over `words`, found by BFS.
///
/// Components are discovered in input order and each component lists its
/// words in BFS visit order, neighbors expanded in edge order. Edges with an
/// endpoint outside `words` are ignored; a word without edges is a
/// component of one.
pub fn connected_components(words: &[String], edges: &[SimilarityEdge]) -> Vec<Vec<String>> {
    let index: HashMap<&str, usize> = words
        .iter()
        .enumerate()
        .map(|(i, w)| (w.as_str(), i))
        .collect();

    let mut adj: Vec<Vec<usize>> = vec![Vec::new(); words.len()];
    for e in edges {
        if let (Some(&i), Some(&j)) = (index.get(e.a.as_str()), index.get(e.b.as_str())) {
            if i != j {
                adj[i].push(j);
                adj[j].push(i);
            }
        }
    }

    let mut visited = vec![false; words.len()];
    let mut components = Vec::new();
    let mut queue = VecDeque::new();

    for start in 0..words.len() {
        if visited[start] {
            continue;
        }
        visited[start] = true;
        queue.push_back(start);

        let mut component = Vec::new();
        while let Some(u) = queue.pop_front() {
            component.push(words[u].clone());
            for &v in &adj[u] {
                if !visited[v] {
                    visited[v] = true;
                    queue.push_back(v);
                }
            }
        }
        components.push(component);
    }

    components
}
