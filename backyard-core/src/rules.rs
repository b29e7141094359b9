//! Backyard rules: informational toggles, delivery effects and one-tap awards.

use serde::{Deserialize, Serialize};

/// Id of the built-in "6 and Out" rule.
pub const SIX_AND_OUT: &str = "6out";

/// Condition on a delivery that makes a rule effect fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RuleTrigger {
    /// Exactly this many runs came off the bat.
    RunsOffBat(u32),
}

impl RuleTrigger {
    pub fn matches(&self, runs_off_bat: u32) -> bool {
        match self {
            RuleTrigger::RunsOffBat(runs) => *runs == runs_off_bat,
        }
    }
}

/// What happens to a delivery when a rule's trigger matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleEffect {
    pub trigger: RuleTrigger,
    /// Turn the delivery into a dismissal.
    #[serde(default)]
    pub dismiss: bool,
    /// Wickets consumed on top of the usual one.
    #[serde(default)]
    pub extra_wickets: u32,
    /// Replaces the default out label when the striker is sent off.
    #[serde(default)]
    pub out_label: Option<String>,
}

/// A configurable modifier to standard scoring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialRule {
    pub id: String,
    pub name: String,
    pub description: String,
    pub enabled: bool,
    #[serde(default)]
    pub custom_runs: Option<u32>,
    #[serde(default)]
    pub custom_wickets: Option<u32>,
    #[serde(default)]
    pub effect: Option<RuleEffect>,
}

impl SpecialRule {
    /// A rule with no engine effect; players agree on it among themselves.
    pub fn toggle(id: &str, name: &str, description: &str, enabled: bool) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            enabled,
            custom_runs: None,
            custom_wickets: None,
            effect: None,
        }
    }

    /// A one-tap award of runs and wickets. The id is unique within `existing`.
    pub fn custom(name: &str, runs: u32, wickets: u32, existing: &[SpecialRule]) -> Self {
        Self {
            id: next_custom_id(existing),
            name: name.trim().to_string(),
            description: format!("Custom rule: {} runs, {} wickets awarded.", runs, wickets),
            enabled: true,
            custom_runs: Some(runs),
            custom_wickets: Some(wickets),
            effect: None,
        }
    }

    pub fn with_effect(mut self, effect: RuleEffect) -> Self {
        self.effect = Some(effect);
        self
    }

    /// True when the rule is scored as its own action rather than consulted per ball.
    pub fn is_custom_award(&self) -> bool {
        self.custom_runs.is_some() || self.custom_wickets.is_some()
    }

    /// Runs and wickets the award grants; a missing half counts as zero.
    pub fn award(&self) -> Option<(u32, u32)> {
        self.is_custom_award().then(|| {
            (
                self.custom_runs.unwrap_or(0),
                self.custom_wickets.unwrap_or(0),
            )
        })
    }
}

fn next_custom_id(existing: &[SpecialRule]) -> String {
    (1..)
        .map(|n| format!("custom-{}", n))
        .find(|id| !existing.iter().any(|r| &r.id == id))
        .unwrap_or_default()
}

/// The built-in rule catalogue offered before every match.
pub fn default_special_rules() -> Vec<SpecialRule> {
    vec![
        SpecialRule::toggle(
            "1h1b",
            "One Hand, One Bounce",
            "Fielders can catch with one hand after one bounce.",
            false,
        ),
        SpecialRule::toggle(
            SIX_AND_OUT,
            "6 and Out",
            "Hitting a six results in 6 runs but the batsman is out.",
            true,
        )
        .with_effect(RuleEffect {
            trigger: RuleTrigger::RunsOffBat(6),
            dismiss: true,
            extra_wickets: 0,
            out_label: Some("6 and OUT!".to_string()),
        }),
        SpecialRule::toggle(
            "fence",
            "Hit the Fence = Out",
            "If the ball hits the boundary fence/wall directly, you are out.",
            false,
        ),
        SpecialRule::toggle(
            "elec",
            "Electric Wickie",
            "Any touch behind the stumps is out.",
            true,
        ),
        SpecialRule::toggle(
            "tipsy",
            "Tipsy-Run (Must Run)",
            "If the bat touches the ball, you must run.",
            false,
        ),
        SpecialRule::toggle(
            "lastman",
            "Last Man Stands",
            "The last batsman can bat alone until they are out.",
            false,
        ),
    ]
}

/// Combined result of every enabled rule effect that fired on one delivery.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TriggeredEffects {
    pub dismissal: bool,
    pub extra_wickets: u32,
    pub out_label: Option<String>,
}

/// Evaluate enabled rule effects against the runs scored off the bat.
/// The first matching label wins.
pub fn triggered_effects(rules: &[SpecialRule], runs_off_bat: u32) -> TriggeredEffects {
    rules
        .iter()
        .filter(|rule| rule.enabled)
        .filter_map(|rule| rule.effect.as_ref())
        .filter(|effect| effect.trigger.matches(runs_off_bat))
        .fold(TriggeredEffects::default(), |mut acc, effect| {
            acc.dismissal |= effect.dismiss || effect.extra_wickets > 0;
            acc.extra_wickets = acc.extra_wickets.saturating_add(effect.extra_wickets);
            if acc.out_label.is_none() {
                acc.out_label = effect.out_label.clone();
            }
            acc
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalogue_has_unique_ids() {
        let rules = default_special_rules();
        assert_eq!(rules.len(), 6);
        for rule in &rules {
            assert_eq!(rules.iter().filter(|r| r.id == rule.id).count(), 1);
        }
    }

    #[test]
    fn six_and_out_fires_only_on_six() {
        let rules = default_special_rules();
        let six = triggered_effects(&rules, 6);
        assert!(six.dismissal);
        assert_eq!(six.extra_wickets, 0);
        assert_eq!(six.out_label.as_deref(), Some("6 and OUT!"));

        assert_eq!(triggered_effects(&rules, 4), TriggeredEffects::default());
    }

    #[test]
    fn disabled_rules_do_not_fire() {
        let mut rules = default_special_rules();
        for rule in &mut rules {
            rule.enabled = false;
        }
        assert!(!triggered_effects(&rules, 6).dismissal);
    }

    #[test]
    fn effects_stack_wickets_and_keep_first_label() {
        let rules = vec![
            SpecialRule::toggle("a", "A", "", true).with_effect(RuleEffect {
                trigger: RuleTrigger::RunsOffBat(3),
                dismiss: false,
                extra_wickets: 1,
                out_label: Some("first".to_string()),
            }),
            SpecialRule::toggle("b", "B", "", true).with_effect(RuleEffect {
                trigger: RuleTrigger::RunsOffBat(3),
                dismiss: true,
                extra_wickets: 2,
                out_label: Some("second".to_string()),
            }),
        ];

        let effects = triggered_effects(&rules, 3);
        assert!(effects.dismissal);
        assert_eq!(effects.extra_wickets, 3);
        assert_eq!(effects.out_label.as_deref(), Some("first"));
    }

    #[test]
    fn custom_rules_get_fresh_ids_and_awards() {
        let mut rules = default_special_rules();
        let first = SpecialRule::custom("Over the Fence", 10, 1, &rules);
        rules.push(first.clone());
        let second = SpecialRule::custom("Into the Pool", 0, 2, &rules);

        assert_eq!(first.id, "custom-1");
        assert_eq!(second.id, "custom-2");
        assert_eq!(first.award(), Some((10, 1)));
        assert_eq!(
            first.description,
            "Custom rule: 10 runs, 1 wickets awarded."
        );
    }

    #[test]
    fn half_specified_award_defaults_to_zero() {
        let mut rule = SpecialRule::toggle("x", "X", "", true);
        assert_eq!(rule.award(), None);
        rule.custom_wickets = Some(1);
        assert_eq!(rule.award(), Some((0, 1)));
    }

    #[test]
    fn rules_deserialize_without_optional_fields() {
        let rule: SpecialRule = serde_json::from_str(
            r#"{"id":"x","name":"X","description":"d","enabled":true}"#,
        )
        .unwrap();
        assert!(!rule.is_custom_award());
        assert!(rule.effect.is_none());
    }
}
