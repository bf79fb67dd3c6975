use std::fmt;

use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::error::{NnError, Result};
use crate::layers::{Linear, Relu, Sigmoid};
use crate::network::network::Network;

/// Standard deviation for Linear weights when none is given.
pub const DEFAULT_INIT_STD: f64 = 0.01;

/// One entry of an architecture string.
///
/// | token          | layer                     |
/// |----------------|---------------------------|
/// | `Lin-<in>-<out>` | `Linear` named `linear` |
/// | `Relu`         | `Relu` named `relu`       |
/// | `Sigm`         | `Sigmoid` named `sigm`    |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LayerKind {
    Linear { in_dim: usize, out_dim: usize },
    Relu,
    Sigmoid,
}

impl LayerKind {
    fn parse(token: &str) -> Result<LayerKind> {
        let parts: Vec<&str> = token.split('-').collect();
        match parts.as_slice() {
            ["Lin", in_dim, out_dim] => Ok(LayerKind::Linear {
                in_dim: parse_dim(in_dim, token)?,
                out_dim: parse_dim(out_dim, token)?,
            }),
            ["Relu"] => Ok(LayerKind::Relu),
            ["Sigm"] | ["Sigmoid"] => Ok(LayerKind::Sigmoid),
            _ => Err(NnError::Parse(format!("unknown layer token '{}'", token))),
        }
    }
}

impl fmt::Display for LayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayerKind::Linear { in_dim, out_dim } => write!(f, "Lin-{}-{}", in_dim, out_dim),
            LayerKind::Relu => write!(f, "Relu"),
            LayerKind::Sigmoid => write!(f, "Sigm"),
        }
    }
}

fn parse_dim(raw: &str, token: &str) -> Result<usize> {
    match raw.parse::<usize>() {
        Ok(0) | Err(_) => Err(NnError::Parse(format!(
            "'{}' in '{}' is not a positive layer width",
            raw, token
        ))),
        Ok(n) => Ok(n),
    }
}

/// A serializable description of a layer stack, e.g. `"Lin-784-100 Relu Lin-100-10"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Architecture {
    pub layers: Vec<LayerKind>,
    pub init_std: f64,
}

impl Architecture {
    /// Parses space-separated layer tokens. Consecutive Linear layers must
    /// agree on the dimension they share.
    pub fn parse(arch: &str, init_std: f64) -> Result<Architecture> {
        let layers = arch.split_whitespace()
            .map(LayerKind::parse)
            .collect::<Result<Vec<_>>>()?;
        if layers.is_empty() {
            return Err(NnError::Parse("architecture string has no layers".into()));
        }

        let mut width: Option<usize> = None;
        for layer in &layers {
            if let LayerKind::Linear { in_dim, out_dim } = *layer {
                if let Some(prev) = width {
                    if prev != in_dim {
                        return Err(NnError::Parse(format!(
                            "{} follows a layer producing {} features",
                            layer, prev
                        )));
                    }
                }
                width = Some(out_dim);
            }
        }

        Ok(Architecture { layers, init_std })
    }

    pub fn input_dim(&self) -> Option<usize> {
        self.layers.iter().find_map(|l| match l {
            LayerKind::Linear { in_dim, .. } => Some(*in_dim),
            _ => None,
        })
    }

    pub fn output_dim(&self) -> Option<usize> {
        self.layers.iter().rev().find_map(|l| match l {
            LayerKind::Linear { out_dim, .. } => Some(*out_dim),
            _ => None,
        })
    }

    pub fn build(&self) -> Network {
        self.build_with_rng(&mut rand::thread_rng())
    }

    pub fn build_with_rng<R: Rng + ?Sized>(&self, rng: &mut R) -> Network {
        let mut network = Network::new();
        for layer in &self.layers {
            match *layer {
                LayerKind::Linear { in_dim, out_dim } => {
                    network.add(Box::new(Linear::with_rng("linear", in_dim, out_dim, self.init_std, rng)))
                }
                LayerKind::Relu => network.add(Box::new(Relu::new("relu"))),
                LayerKind::Sigmoid => network.add(Box::new(Sigmoid::new("sigm"))),
            }
        }
        network
    }

    /// Serializes the architecture to a pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Deserializes an architecture previously written by `save_json`.
    pub fn load_json(path: &str) -> Result<Architecture> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }
}

impl fmt::Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tokens: Vec<String> = self.layers.iter().map(|l| l.to_string()).collect();
        write!(f, "{}", tokens.join(" "))
    }
}
