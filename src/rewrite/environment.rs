//! Per-constructor record of action names derived from `inst_next` and the claims that check them.

use smallvec::SmallVec;

use super::config::{INST_NEXT, NameMatching, RewriteConfig};
use crate::sleigh::lexer::{identifiers, is_identifier};

#[derive(Debug, Clone, PartialEq, Eq)]
struct Prior {
    name: String,
    claim: String,
}

/// Ordered `(name, claim)` log. Lookups report claims in registration order.
#[derive(Debug, Clone)]
pub struct DependencyEnvironment<'cfg> {
    config: &'cfg RewriteConfig,
    priors: SmallVec<[Prior; 4]>,
}

impl<'cfg> DependencyEnvironment<'cfg> {
    /// Creates an environment that already knows `inst_next` itself.
    pub fn new(config: &'cfg RewriteConfig) -> Self {
        let mut env = Self {
            config,
            priors: SmallVec::new(),
        };
        env.register(&format!("{INST_NEXT}={INST_NEXT}"));
        env
    }

    /// Records one `name=expression` action statement when the expression mentions `inst_next`.
    ///
    /// Returns whether a claim was stored. Re-registering a name replaces its claim but keeps its
    /// original position.
    pub fn register(&mut self, statement: &str) -> bool {
        let Some((name, expression)) = statement.split_once('=') else {
            return false;
        };
        let (name, expression) = (name.trim(), expression.trim());
        if name.is_empty() || !expression.contains(INST_NEXT) {
            return false;
        }

        let claim = self.claim_for(name, expression);
        match self.priors.iter_mut().find(|prior| prior.name == name) {
            Some(existing) => existing.claim = claim,
            None => self.priors.push(Prior {
                name: name.to_string(),
                claim,
            }),
        }
        true
    }

    fn claim_for(&self, name: &str, expression: &str) -> String {
        let RewriteConfig {
            program_counter,
            size_hint,
            temp_name,
            claim_op,
            ..
        } = self.config;
        let runtime = expression.replace(INST_NEXT, program_counter);
        format!("{temp_name}:{size_hint}={name};\n{claim_op}({temp_name},{runtime})")
    }

    /// Claims for every registered name referenced by `text`, in registration order.
    pub fn priors_for(&self, text: &str) -> Vec<&str> {
        match self.config.name_matching {
            NameMatching::Substring => self
                .priors
                .iter()
                .filter(|prior| text.contains(prior.name.as_str()))
                .map(|prior| prior.claim.as_str())
                .collect(),
            NameMatching::Identifier => {
                let idents = identifiers(text);
                self.priors
                    .iter()
                    .filter(|prior| {
                        if is_identifier(&prior.name) {
                            idents.contains(prior.name.as_str())
                        } else {
                            text.contains(prior.name.as_str())
                        }
                    })
                    .map(|prior| prior.claim.as_str())
                    .collect()
            }
        }
    }

    /// True once an action statement contributed a name beyond the `inst_next` baseline.
    pub fn has_derived(&self) -> bool {
        self.priors.len() > 1
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.priors.iter().map(|prior| prior.name.as_str())
    }
}
