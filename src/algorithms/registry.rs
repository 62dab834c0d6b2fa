use std::collections::BTreeMap;

use serde_json::Value;

use super::{Algorithm, Dega, DegaA, DegaB, DegaLimit, Umda};
use crate::error::{ExperimentError, Result};

/// Arguments handed to an algorithm constructor, keyed by parameter name.
///
/// The sorted map keeps the serialized form canonical, which the job cache
/// relies on for key derivation.
pub type AlgoArgs = BTreeMap<String, Value>;

/// Builds a boxed algorithm for bit vectors of length `n` from its
/// argument map.
pub type AlgorithmConstructor = fn(usize, &AlgoArgs) -> Result<Box<dyn Algorithm>>;

/// Process-wide lookup table from algorithm names to constructors.
///
/// The registry is built once at startup and treated as read-only
/// afterwards; constructors validate their argument maps so that bad
/// configurations fail before any execution starts.
pub struct AlgorithmRegistry {
    registry: BTreeMap<String, AlgorithmConstructor>,
}

impl AlgorithmRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            registry: BTreeMap::new(),
        }
    }

    /// The registry of built-in algorithm variants.
    pub fn builtin() -> Self {
        let mut registry: BTreeMap<String, AlgorithmConstructor> = BTreeMap::new();
        registry.insert("DEGA".to_string(), build_dega);
        registry.insert("DEGA_A".to_string(), build_dega_a);
        registry.insert("DEGA_B".to_string(), build_dega_b);
        registry.insert("DEGA_Limit".to_string(), build_dega_limit);
        registry.insert("UMDA".to_string(), build_umda);
        Self { registry }
    }

    /// Registers an algorithm constructor under `name`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `name` is already registered.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        constructor: AlgorithmConstructor,
    ) -> Result<()> {
        let name = name.into();
        if self.registry.contains_key(&name) {
            return Err(ExperimentError::Configuration(format!(
                "algorithm '{}' already registered",
                name
            )));
        }
        self.registry.insert(name, constructor);
        Ok(())
    }

    /// Instantiates an algorithm by its registry name.
    ///
    /// # Errors
    ///
    /// Returns a configuration error listing the available names if `name`
    /// is unknown, or whatever error the constructor raises for a bad
    /// argument map.
    pub fn create(&self, name: &str, n: usize, args: &AlgoArgs) -> Result<Box<dyn Algorithm>> {
        let constructor = self.registry.get(name).ok_or_else(|| {
            ExperimentError::Configuration(format!(
                "no algorithm registered under '{}', available: {:?}",
                name,
                self.available()
            ))
        })?;
        constructor(n, args)
    }

    /// The registered algorithm names, in sorted order.
    pub fn available(&self) -> Vec<String> {
        self.registry.keys().cloned().collect()
    }
}

impl Default for AlgorithmRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Rejects argument names the algorithm does not understand.
fn reject_unknown(args: &AlgoArgs, allowed: &[&str], algorithm: &str) -> Result<()> {
    for key in args.keys() {
        if !allowed.contains(&key.as_str()) {
            return Err(ExperimentError::Configuration(format!(
                "unknown parameter '{}' for {}, allowed: {:?}",
                key, algorithm, allowed
            )));
        }
    }
    Ok(())
}

fn parse_u64(value: &Value, name: &str, algorithm: &str) -> Result<u64> {
    value.as_u64().ok_or_else(|| {
        ExperimentError::Configuration(format!(
            "parameter '{}' of {} must be a non-negative integer, got {}",
            name, algorithm, value
        ))
    })
}

fn require_u64(args: &AlgoArgs, name: &str, algorithm: &str) -> Result<u64> {
    match args.get(name) {
        Some(value) => parse_u64(value, name, algorithm),
        None => Err(ExperimentError::Configuration(format!(
            "{} requires parameter '{}'",
            algorithm, name
        ))),
    }
}

fn optional_u64(args: &AlgoArgs, name: &str, algorithm: &str) -> Result<Option<u64>> {
    args.get(name)
        .map(|value| parse_u64(value, name, algorithm))
        .transpose()
}

fn require_positive(value: u64, name: &str, algorithm: &str) -> Result<u64> {
    if value == 0 {
        return Err(ExperimentError::Configuration(format!(
            "parameter '{}' of {} must be at least 1",
            name, algorithm
        )));
    }
    Ok(value)
}

fn build_dega(n: usize, args: &AlgoArgs) -> Result<Box<dyn Algorithm>> {
    reject_unknown(args, &["lamb"], "DEGA")?;
    let lambda = require_positive(require_u64(args, "lamb", "DEGA")?, "lamb", "DEGA")?;
    Ok(Box::new(Dega::new(n, lambda)))
}

fn build_dega_a(n: usize, args: &AlgoArgs) -> Result<Box<dyn Algorithm>> {
    reject_unknown(args, &[], "DEGA_A")?;
    Ok(Box::new(DegaA::new(n)))
}

fn build_dega_b(n: usize, args: &AlgoArgs) -> Result<Box<dyn Algorithm>> {
    reject_unknown(args, &["u"], "DEGA_B")?;
    let algorithm = match optional_u64(args, "u", "DEGA_B")? {
        Some(u) => DegaB::with_budget(n, u),
        None => DegaB::new(n),
    };
    Ok(Box::new(algorithm))
}

fn build_dega_limit(n: usize, args: &AlgoArgs) -> Result<Box<dyn Algorithm>> {
    reject_unknown(args, &["lamb", "u"], "DEGA_Limit")?;
    let lambda = require_positive(
        require_u64(args, "lamb", "DEGA_Limit")?,
        "lamb",
        "DEGA_Limit",
    )?;
    let algorithm = match optional_u64(args, "u", "DEGA_Limit")? {
        Some(u) => DegaLimit::with_limit(n, lambda, u),
        None => DegaLimit::new(n, lambda),
    };
    Ok(Box::new(algorithm))
}

fn build_umda(n: usize, args: &AlgoArgs) -> Result<Box<dyn Algorithm>> {
    reject_unknown(args, &["lamb", "mu"], "UMDA")?;
    let lambda = require_u64(args, "lamb", "UMDA")?;
    let mu = require_u64(args, "mu", "UMDA")?;
    Ok(Box::new(Umda::new(n, lambda as usize, mu as usize)?))
}
