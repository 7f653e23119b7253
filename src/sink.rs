//! # Persistence sinks
//!
//! After every completed generation the evolution loop hands one
//! [`IndividualRecord`] per surviving individual to a [`PersistenceSink`].
//! Sinks report failures as errors; the loop logs them and carries on.
//!
//! Any closure `FnMut(&IndividualRecord) -> Result<()>` is a sink:
//!
//! ```rust
//! use onemax::sink::{IndividualRecord, PersistenceSink};
//!
//! let mut seen = Vec::new();
//! let mut sink = |record: &IndividualRecord| -> onemax::error::Result<()> {
//!     seen.push(record.fitness);
//!     Ok(())
//! };
//! let record = IndividualRecord { entities: vec![1, 0], amount: 2, fitness: 1, generation: 3 };
//! sink.persist(&record).unwrap();
//! assert_eq!(seen, vec![1]);
//! ```

use std::io::Write;
use std::net::TcpStream;

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::{
    error::{GeneticError, Result},
    evolution::options::SinkConfig,
    individual::Individual,
};

/// The persisted shape of an individual.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndividualRecord {
    /// The genes, each 0 or 1.
    pub entities: Vec<u8>,
    /// Genome length.
    pub amount: usize,
    pub fitness: usize,
    pub generation: usize,
}

impl From<&Individual> for IndividualRecord {
    fn from(individual: &Individual) -> Self {
        Self {
            entities: individual.genome().genes().to_vec(),
            amount: individual.genome().len(),
            fitness: individual.fitness(),
            generation: individual.generation(),
        }
    }
}

/// Receives one record per surviving individual per generation.
pub trait PersistenceSink {
    fn persist(&mut self, record: &IndividualRecord) -> Result<()>;
}

impl<F> PersistenceSink for F
where
    F: FnMut(&IndividualRecord) -> Result<()>,
{
    fn persist(&mut self, record: &IndividualRecord) -> Result<()> {
        self(record)
    }
}

/// Discards every record.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl PersistenceSink for NullSink {
    fn persist(&mut self, _record: &IndividualRecord) -> Result<()> {
        Ok(())
    }
}

/// Writes each record as a JSON document over its own TCP connection.
///
/// A connection is opened per record and closed right after the write.
/// Nothing is batched or retried. Connect and write failures are reported
/// as `GeneticError::Persistence`.
#[derive(Debug, Clone)]
pub struct TcpSink {
    host: String,
    port: u16,
    index: String,
}

impl TcpSink {
    pub fn new(host: impl Into<String>, port: u16, index: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port,
            index: index.into(),
        }
    }

    pub fn from_config(config: &SinkConfig) -> Self {
        Self::new(config.host.clone(), config.port, config.index.clone())
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn index(&self) -> &str {
        &self.index
    }
}

impl PersistenceSink for TcpSink {
    #[instrument(level = "trace", skip(self, record), fields(host = %self.host, port = self.port, index = %self.index, generation = record.generation))]
    fn persist(&mut self, record: &IndividualRecord) -> Result<()> {
        let mut stream = TcpStream::connect((self.host.as_str(), self.port)).map_err(|e| {
            GeneticError::Persistence(format!(
                "Failed to connect to {}:{}: {}",
                self.host, self.port, e
            ))
        })?;
        serde_json::to_writer(&mut stream, record)
            .map_err(|e| GeneticError::Persistence(format!("Failed to write record: {}", e)))?;
        stream
            .flush()
            .map_err(|e| GeneticError::Persistence(format!("Failed to flush record: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genome::Genome;

    #[test]
    fn test_record_from_individual() {
        let mut individual = Individual::new(Genome::from_genes(vec![1, 0, 1]).unwrap(), 0);
        individual.set_generation(4);
        let record = IndividualRecord::from(&individual);
        assert_eq!(
            record,
            IndividualRecord {
                entities: vec![1, 0, 1],
                amount: 3,
                fitness: 2,
                generation: 4,
            }
        );
    }

    #[test]
    fn test_record_json_shape() {
        let record = IndividualRecord {
            entities: vec![0, 1],
            amount: 2,
            fitness: 1,
            generation: 0,
        };
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(
            json,
            r#"{"entities":[0,1],"amount":2,"fitness":1,"generation":0}"#
        );
    }

    #[test]
    fn test_null_sink_accepts_everything() {
        let record = IndividualRecord {
            entities: vec![1],
            amount: 1,
            fitness: 1,
            generation: 0,
        };
        assert!(NullSink.persist(&record).is_ok());
    }
}
