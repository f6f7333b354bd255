//! Scene Conversion
//!
//! - `naming`: output node names (prefix stripping, duplicate counters)
//! - `converter`: hierarchy walk and the conversion run

pub mod converter;
pub mod naming;

pub use converter::{ConversionContext, ConvertedScene, OutputNode, SceneConverter};
pub use naming::{NameCache, NodeNames, fix_node_name};
