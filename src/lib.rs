#![allow(dead_code)]

pub mod board;
pub mod cli;
pub mod cluster;
pub mod consts;
pub mod coords;
pub mod evaluator;
pub mod player;
pub mod rules;
pub mod run;
pub mod search;
pub mod tube;

pub mod utils {
    pub mod prelude {
        pub use anyhow::{anyhow, Context, Error};
        pub type Result<T> = anyhow::Result<T, Error>;

        pub use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
    }
}

pub mod prelude {
    pub use super::board::{Board, Cell};
    pub use super::cli::{Driver, EngineOptions};
    pub use super::consts::*;
    pub use super::coords::{Axis, MoveNotation, Square};
    pub use super::evaluator::Evaluator;
    pub use super::player::Player;
    pub use super::rules::{Game, MoveRecord};
    pub use super::search::{Search, SearchResult};
    pub use super::utils::prelude::*;
}
