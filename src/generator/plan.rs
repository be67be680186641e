//! Lowering of a configuration into a generation plan
//!
//! The plan replaces the string-keyed lookups of the runtime procedure with
//! records keyed by stable ordinals. Every conflict in the configuration is
//! resolved here, first declaration wins, and reported as a warning.

use crate::config::{ArgIndex, CompletionSource, Config};
use std::collections::{BTreeMap, HashMap};

/// Ordinal of a distinct flag literal, in declaration order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FlagId(pub usize);

/// A distinct flag literal
#[derive(Debug, Clone, PartialEq)]
pub struct FlagPlan<'a> {
    pub id: FlagId,
    pub literal: &'a str,
    pub takes_value: bool,
    /// Source for the flag's value
    pub comp: Option<&'a CompletionSource>,
    /// Referenced by some `skip_if`, so its use must be recorded
    pub tracked: bool,
}

/// An explicit positional slot
#[derive(Debug, Clone, PartialEq)]
pub struct SlotPlan<'a> {
    pub index: u32,
    pub comp: Option<&'a CompletionSource>,
    /// Flags whose use drops this slot's requiredness
    pub skip_if: Vec<FlagId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Plan<'a> {
    pub command: &'a str,
    pub prefix: &'a str,
    pub use_doubledash: bool,
    pub flags: Vec<FlagPlan<'a>>,
    /// Explicit slots, ascending by index
    pub slots: Vec<SlotPlan<'a>>,
    /// Source of the catch-all slot
    pub rest: Option<&'a CompletionSource>,
    pub warnings: Vec<String>,
}

impl<'a> Plan<'a> {
    pub fn new(config: &'a Config) -> Self {
        let mut warnings = Vec::new();
        let prefix = config.short_opt_prefix.as_str();

        let mut flags: Vec<FlagPlan<'a>> = Vec::new();
        let mut by_literal: HashMap<&'a str, FlagId> = HashMap::new();
        for opt in &config.opts {
            let comp = opt.value.as_ref().and_then(|value| value.comp.as_ref());
            for literal in &opt.short {
                if by_literal.contains_key(literal.as_str()) {
                    warnings.push(format!(
                        "flag '{}' is declared more than once; the first declaration wins",
                        literal
                    ));
                    continue;
                }
                if !literal.starts_with(prefix) {
                    warnings.push(format!(
                        "flag '{}' does not start with '{}' and will never be recognized while scanning",
                        literal, prefix
                    ));
                }
                let id = FlagId(flags.len());
                by_literal.insert(literal.as_str(), id);
                flags.push(FlagPlan {
                    id,
                    literal: literal.as_str(),
                    takes_value: opt.takes_value(),
                    comp,
                    tracked: false,
                });
            }
        }

        let mut slots: BTreeMap<u32, SlotPlan<'a>> = BTreeMap::new();
        let mut rest: Option<Option<&'a CompletionSource>> = None;
        for arg in &config.args {
            let skip_if = arg
                .skip_if
                .as_ref()
                .map(|s| s.has_opt_any.as_slice())
                .unwrap_or(&[]);
            match arg.index {
                ArgIndex::Rest => {
                    if rest.is_some() {
                        warnings.push(
                            "catch-all argument is declared more than once; the first declaration wins"
                                .to_string(),
                        );
                        continue;
                    }
                    if !skip_if.is_empty() {
                        warnings
                            .push("skip_if on the catch-all argument has no effect".to_string());
                    }
                    rest = Some(arg.comp.as_ref());
                }
                ArgIndex::Position(index) => {
                    if slots.contains_key(&index) {
                        warnings.push(format!(
                            "argument index {} is declared more than once; the first declaration wins",
                            index
                        ));
                        continue;
                    }
                    let mut skip_ids = Vec::new();
                    for literal in skip_if {
                        match by_literal.get(literal.as_str()) {
                            Some(&id) => {
                                flags[id.0].tracked = true;
                                if !skip_ids.contains(&id) {
                                    skip_ids.push(id);
                                }
                            }
                            None => warnings.push(format!(
                                "skip_if of argument {} names undeclared flag '{}'",
                                index, literal
                            )),
                        }
                    }
                    slots.insert(
                        index,
                        SlotPlan {
                            index,
                            comp: arg.comp.as_ref(),
                            skip_if: skip_ids,
                        },
                    );
                }
            }
        }

        Plan {
            command: &config.name,
            prefix,
            use_doubledash: config.use_doubledash,
            flags,
            slots: slots.into_values().collect(),
            rest: rest.flatten(),
            warnings,
        }
    }

    pub fn has_flags(&self) -> bool {
        !self.flags.is_empty()
    }

    pub fn has_tracked_flags(&self) -> bool {
        self.flags.iter().any(|flag| flag.tracked)
    }

    pub fn value_flags(&self) -> impl Iterator<Item = &FlagPlan<'a>> {
        self.flags.iter().filter(|flag| flag.takes_value)
    }
}
