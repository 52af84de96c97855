//! # Search Result Containers
//!
//! The k-NN result container loaded vector fields are queried into, plus
//! the metric-type helpers that decide how its scores order. No search
//! logic lives here; the index library produces the flat id/distance
//! arrays and this module gives them shape and accessors.

use std::str::FromStr;

use eyre::{bail, ensure, Result};

/// Vector similarity metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricType {
    /// Inner product. Larger scores mean closer vectors.
    Ip,
    /// Squared Euclidean distance. Smaller scores mean closer vectors.
    L2,
}

impl MetricType {
    /// True when a larger score means a closer match.
    pub fn positively_related(&self) -> bool {
        matches!(self, MetricType::Ip)
    }

    /// True if score `a` ranks closer than score `b` under this metric.
    pub fn closer(&self, a: f32, b: f32) -> bool {
        if self.positively_related() {
            a > b
        } else {
            a < b
        }
    }
}

impl FromStr for MetricType {
    type Err = eyre::Report;

    fn from_str(s: &str) -> Result<Self> {
        if s.eq_ignore_ascii_case("IP") {
            Ok(MetricType::Ip)
        } else if s.eq_ignore_ascii_case("L2") {
            Ok(MetricType::L2)
        } else {
            bail!("unknown metric type '{}'", s)
        }
    }
}

/// Result of a k-NN search: `top_k` neighbors for each of `num_queries`
/// query vectors, as flat row-major id and distance arrays.
#[derive(Debug, Clone)]
pub struct SearchDataset {
    num_queries: usize,
    top_k: usize,
    ids: Vec<i64>,
    distances: Vec<f32>,
}

impl SearchDataset {
    /// Builds the container, validating that both arrays hold exactly
    /// `num_queries * top_k` entries.
    pub fn new(
        num_queries: usize,
        top_k: usize,
        ids: Vec<i64>,
        distances: Vec<f32>,
    ) -> Result<Self> {
        let expected = num_queries * top_k;
        ensure!(
            ids.len() == expected,
            "ids hold {} entries, expected {} ({} queries x top {})",
            ids.len(),
            expected,
            num_queries,
            top_k
        );
        ensure!(
            distances.len() == expected,
            "distances hold {} entries, expected {} ({} queries x top {})",
            distances.len(),
            expected,
            num_queries,
            top_k
        );

        Ok(Self {
            num_queries,
            top_k,
            ids,
            distances,
        })
    }

    pub fn num_queries(&self) -> usize {
        self.num_queries
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    pub fn ids(&self) -> &[i64] {
        &self.ids
    }

    pub fn distances(&self) -> &[f32] {
        &self.distances
    }

    /// The neighbor ids of one query.
    pub fn query_ids(&self, query: usize) -> Result<&[i64]> {
        ensure!(
            query < self.num_queries,
            "query {} out of bounds (num_queries={})",
            query,
            self.num_queries
        );

        let start = query * self.top_k;
        Ok(&self.ids[start..start + self.top_k])
    }

    /// The neighbor distances of one query.
    pub fn query_distances(&self, query: usize) -> Result<&[f32]> {
        ensure!(
            query < self.num_queries,
            "query {} out of bounds (num_queries={})",
            query,
            self.num_queries
        );

        let start = query * self.top_k;
        Ok(&self.distances[start..start + self.top_k])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metric_parse_is_case_insensitive() {
        assert_eq!("IP".parse::<MetricType>().unwrap(), MetricType::Ip);
        assert_eq!("ip".parse::<MetricType>().unwrap(), MetricType::Ip);
        assert_eq!("l2".parse::<MetricType>().unwrap(), MetricType::L2);
        assert!("cosine".parse::<MetricType>().is_err());
    }

    #[test]
    fn ip_is_positively_related() {
        assert!(MetricType::Ip.positively_related());
        assert!(!MetricType::L2.positively_related());
    }

    #[test]
    fn closer_respects_metric_direction() {
        assert!(MetricType::Ip.closer(0.9, 0.5));
        assert!(MetricType::L2.closer(0.1, 0.5));
    }

    #[test]
    fn dataset_validates_lengths() {
        assert!(SearchDataset::new(2, 3, vec![0; 6], vec![0.0; 6]).is_ok());
        assert!(SearchDataset::new(2, 3, vec![0; 5], vec![0.0; 6]).is_err());
        assert!(SearchDataset::new(2, 3, vec![0; 6], vec![0.0; 7]).is_err());
    }

    #[test]
    fn query_rows_slice_flat_arrays() {
        let dataset = SearchDataset::new(
            2,
            3,
            vec![10, 11, 12, 20, 21, 22],
            vec![0.1, 0.2, 0.3, 1.1, 1.2, 1.3],
        )
        .unwrap();

        assert_eq!(dataset.query_ids(0).unwrap(), &[10, 11, 12]);
        assert_eq!(dataset.query_ids(1).unwrap(), &[20, 21, 22]);
        assert_eq!(dataset.query_distances(1).unwrap(), &[1.1, 1.2, 1.3]);
        assert!(dataset.query_ids(2).is_err());
    }
}
