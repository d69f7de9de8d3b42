//! Typed configuration records, one per node kind.
//!
//! Settings arrive from the editor as free-form JSON. They are coerced into these
//! records once, when the IR is built, so emitters never inspect raw JSON.

use super::Literal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Configuration for kinds that take no settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmptyConfig {}

// --- Flow ---

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SwitchConfig {
    pub cases: Vec<SwitchCase>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SwitchCase {
    pub value: Literal,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoopMode {
    #[default]
    Counted,
    #[serde(alias = "while")]
    Conditional,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LoopConfig {
    pub mode: LoopMode,
    #[serde(alias = "maxIterations")]
    pub max: Option<i64>,
    pub iterator: Option<String>,
}

impl LoopConfig {
    pub const DEFAULT_MAX: u64 = 10;

    /// The iteration bound; unset or non-positive values fall back to the default.
    pub fn max_iterations(&self) -> u64 {
        match self.max {
            Some(n) if n > 0 => n as u64,
            _ => Self::DEFAULT_MAX,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TickMode {
    /// `(tick + offset)` is a multiple of the interval.
    #[default]
    Multiple,
    /// `tick % interval` equals the offset.
    Modulo,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TickConfig {
    pub interval: i64,
    pub offset: i64,
    pub mode: TickMode,
}

impl Default for TickConfig {
    fn default() -> Self {
        Self {
            interval: 1,
            offset: 0,
            mode: TickMode::Multiple,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReturnConfig {
    pub value: Literal,
}

// --- Query ---

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    #[default]
    All,
    First,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterOp {
    Eq,
    Ne,
    Lt,
    Lte,
    Gt,
    Gte,
    In,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SearchFilter {
    pub field: Option<String>,
    pub op: Option<FilterOp>,
    pub value: Literal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SearchConfig {
    pub find: String,
    pub filters: Vec<SearchFilter>,
    pub limit: Option<u32>,
    pub mode: SearchMode,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            find: "FIND_STRUCTURES".to_string(),
            filters: Vec::new(),
            limit: None,
            mode: SearchMode::All,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ByIdConfig {
    pub id: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LookMode {
    #[default]
    Area,
    Point,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LookConfig {
    pub look: String,
    pub radius: u32,
    pub mode: LookMode,
}

impl Default for LookConfig {
    fn default() -> Self {
        Self {
            look: "LOOK_CREEPS".to_string(),
            radius: 1,
            mode: LookMode::Area,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BestStrategy {
    /// Nearest by straight-line range.
    #[default]
    Range,
    /// Nearest by path length.
    Path,
    Min,
    Max,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BestConfig {
    pub strategy: BestStrategy,
    pub key: Option<String>,
}

// --- Actions ---

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MoveConfig {
    pub target: Literal,
    pub range: Option<u32>,
}

/// Harvest, build and repair: actions that fail with "not in range".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WorkConfig {
    pub target: Literal,
    pub move_closer: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransferFallback {
    #[default]
    None,
    Move,
    Drop,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TransferConfig {
    pub target: Literal,
    pub resource: String,
    pub amount: Option<u32>,
    pub fallback: TransferFallback,
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            target: Literal::Undefined,
            resource: "RESOURCE_ENERGY".to_string(),
            amount: None,
            fallback: TransferFallback::None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WithdrawConfig {
    pub target: Literal,
    pub resource: String,
    pub amount: Option<u32>,
}

impl Default for WithdrawConfig {
    fn default() -> Self {
        Self {
            target: Literal::Undefined,
            resource: "RESOURCE_ENERGY".to_string(),
            amount: None,
        }
    }
}

/// Upgrade, attack and heal.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TargetConfig {
    pub target: Literal,
}

// --- Structures ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyPart {
    #[serde(alias = "WORK")]
    Work,
    #[serde(alias = "CARRY")]
    Carry,
    #[serde(alias = "MOVE")]
    Move,
    #[serde(alias = "ATTACK")]
    Attack,
    #[serde(alias = "RANGED_ATTACK", alias = "rangedAttack")]
    RangedAttack,
    #[serde(alias = "HEAL")]
    Heal,
    #[serde(alias = "TOUGH")]
    Tough,
    #[serde(alias = "CLAIM")]
    Claim,
}

impl BodyPart {
    /// Allocation order used by weighted body generation.
    pub const PRIORITY: [BodyPart; 8] = [
        BodyPart::Work,
        BodyPart::Carry,
        BodyPart::Move,
        BodyPart::Attack,
        BodyPart::RangedAttack,
        BodyPart::Heal,
        BodyPart::Tough,
        BodyPart::Claim,
    ];

    pub const DEFAULT_BODY: [BodyPart; 3] = [BodyPart::Work, BodyPart::Carry, BodyPart::Move];

    pub fn constant(self) -> &'static str {
        match self {
            BodyPart::Work => "WORK",
            BodyPart::Carry => "CARRY",
            BodyPart::Move => "MOVE",
            BodyPart::Attack => "ATTACK",
            BodyPart::RangedAttack => "RANGED_ATTACK",
            BodyPart::Heal => "HEAL",
            BodyPart::Tough => "TOUGH",
            BodyPart::Claim => "CLAIM",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyStrategy {
    #[default]
    Fixed,
    Weighted,
    Preset,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SpawnConfig {
    /// Name of the spawn structure to use.
    pub spawn: Option<String>,
    /// Creep name prefix; the current tick is appended.
    pub name: String,
    pub body: BodyStrategy,
    pub parts: Vec<BodyPart>,
    pub weights: BTreeMap<BodyPart, u32>,
    pub max_parts: u32,
    pub presets: BTreeMap<u32, Vec<BodyPart>>,
    pub level: Option<u32>,
    pub memory: Literal,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            spawn: None,
            name: "worker".to_string(),
            body: BodyStrategy::Fixed,
            parts: BodyPart::DEFAULT_BODY.to_vec(),
            weights: BTreeMap::new(),
            max_parts: 50,
            presets: BTreeMap::new(),
            level: None,
            memory: Literal::Undefined,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LinkConfig {
    pub source: Option<String>,
    pub target: Option<String>,
    pub amount: Option<u32>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketMode {
    Buy,
    #[default]
    Sell,
    Deal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MarketConfig {
    pub mode: MarketMode,
    pub resource: String,
    pub price: Option<f64>,
    pub amount: Option<u32>,
    pub order_id: Option<String>,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            mode: MarketMode::Sell,
            resource: "RESOURCE_ENERGY".to_string(),
            price: None,
            amount: None,
            order_id: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TowerAction {
    Heal,
    Attack,
    Repair,
}

impl TowerAction {
    pub fn as_str(self) -> &'static str {
        match self {
            TowerAction::Heal => "heal",
            TowerAction::Attack => "attack",
            TowerAction::Repair => "repair",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TowerConfig {
    pub priorities: Vec<TowerAction>,
    /// Heal creeps whose hits are below this fraction of their maximum.
    pub heal_below: f64,
    /// Repair structures whose hits are below this fraction of their maximum.
    pub repair_below: f64,
    /// Towers holding less energy than this skip repairs.
    pub min_repair_energy: u32,
}

impl Default for TowerConfig {
    fn default() -> Self {
        Self {
            priorities: vec![TowerAction::Heal, TowerAction::Attack, TowerAction::Repair],
            heal_below: 1.0,
            repair_below: 0.5,
            min_repair_energy: 500,
        }
    }
}

// --- Memory ---

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemoryScope {
    #[default]
    #[serde(alias = "default")]
    Global,
    Room,
    #[serde(alias = "creep")]
    Actor,
}

/// Shared by read, write and delete.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MemoryConfig {
    pub scope: MemoryScope,
    pub path: String,
    /// Read: value used when the stored one is nullish.
    pub default: Literal,
    /// Write: fallback for an unconnected `value` input.
    pub value: Literal,
    /// Write: shallow-merge into the stored object instead of overwriting it.
    pub merge: bool,
}

// --- Tasks ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TaskParam {
    pub key: String,
    #[serde(rename = "type")]
    pub ty: String,
    pub default: Option<Literal>,
}

impl Default for TaskParam {
    fn default() -> Self {
        Self {
            key: String::new(),
            ty: "any".to_string(),
            default: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TaskDefineConfig {
    pub name: Option<String>,
    pub params: Vec<TaskParam>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TaskCallConfig {
    #[serde(alias = "name")]
    pub task: Option<String>,
    pub args: Literal,
}
