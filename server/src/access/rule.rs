//! Permission rule codec.
//!
//! Rights are persisted as a fixed-length 6-character string over `{'0','1'}`
//! and decoded into six independent grant flags addressed by two axes:
//! ownership (`own` / `other`) and scope (`global` / `private` / `public`).
//!
//! Position mapping (index 0 is the most significant character):
//! `[0]=own.global [1]=own.private [2]=own.public
//!  [3]=other.global [4]=other.private [5]=other.public`

use thiserror::Error;

use super::policy::Scope;

/// Length every encoded rule must have.
pub const ENCODED_RULE_LEN: usize = 6;

const ALLOWED: char = '1';

/// Rule decode error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeRuleError {
    /// Encoded rule has the wrong length.
    #[error("Malformed rule: expected {ENCODED_RULE_LEN} characters, got {0}")]
    Malformed(usize),
}

/// One bank of grant flags, either for the owner or for third parties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RuleFlags {
    /// Administrative / create-level grant.
    pub global: bool,
    /// Mutate / delete-level grant.
    pub private: bool,
    /// Read-level grant.
    pub public: bool,
}

impl RuleFlags {
    /// Grant flag for the given scope.
    #[must_use]
    pub const fn scope(&self, scope: Scope) -> bool {
        match scope {
            Scope::Global => self.global,
            Scope::Private => self.private,
            Scope::Public => self.public,
        }
    }
}

/// Decoded form of an encoded rule string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rule {
    /// Grants that apply when the caller owns the resource.
    pub own: RuleFlags,
    /// Grants that apply when the caller does not own the resource.
    pub other: RuleFlags,
}

impl Rule {
    /// Decode an encoded rule string.
    ///
    /// `'1'` grants the flag at its position; any other character denies it.
    /// Fails with [`DecodeRuleError::Malformed`] when the input is not exactly
    /// six characters, so corrupt rights surface instead of silently denying.
    pub fn decode(raw: &str) -> Result<Self, DecodeRuleError> {
        let chars: Vec<char> = raw.chars().collect();
        if chars.len() != ENCODED_RULE_LEN {
            return Err(DecodeRuleError::Malformed(chars.len()));
        }

        Ok(Self {
            own: RuleFlags {
                global: chars[0] == ALLOWED,
                private: chars[1] == ALLOWED,
                public: chars[2] == ALLOWED,
            },
            other: RuleFlags {
                global: chars[3] == ALLOWED,
                private: chars[4] == ALLOWED,
                public: chars[5] == ALLOWED,
            },
        })
    }

    /// Grant bank for the given ownership side.
    #[must_use]
    pub const fn side(&self, trusted: bool) -> &RuleFlags {
        if trusted {
            &self.own
        } else {
            &self.other
        }
    }
}

/// Check that a raw rule string is structurally valid.
///
/// Used by the rights-administration write path to reject malformed rules
/// before they reach storage.
pub fn validate_encoded_rule(raw: &str) -> Result<(), DecodeRuleError> {
    Rule::decode(raw).map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_all_granted() {
        let rule = Rule::decode("111111").unwrap();
        assert_eq!(
            rule.own,
            RuleFlags {
                global: true,
                private: true,
                public: true
            }
        );
        assert_eq!(rule.own, rule.other);
    }

    #[test]
    fn test_decode_all_denied() {
        let rule = Rule::decode("000000").unwrap();
        assert_eq!(rule, Rule::default());
    }

    #[test]
    fn test_decode_positional_mapping() {
        // own.global=1 own.private=0 own.public=1
        // other.global=0 other.private=1 other.public=0
        let rule = Rule::decode("101010").unwrap();

        assert!(rule.own.global);
        assert!(!rule.own.private);
        assert!(rule.own.public);
        assert!(!rule.other.global);
        assert!(rule.other.private);
        assert!(!rule.other.public);
    }

    #[test]
    fn test_decode_each_position_independently() {
        for (index, raw) in [
            "100000", "010000", "001000", "000100", "000010", "000001",
        ]
        .iter()
        .enumerate()
        {
            let rule = Rule::decode(raw).unwrap();
            let flags = [
                rule.own.global,
                rule.own.private,
                rule.own.public,
                rule.other.global,
                rule.other.private,
                rule.other.public,
            ];
            for (position, flag) in flags.iter().enumerate() {
                assert_eq!(*flag, position == index, "rule {raw} position {position}");
            }
        }
    }

    #[test]
    fn test_decode_unknown_characters_deny() {
        // Anything that is not '1' reads as denied, per position.
        let rule = Rule::decode("1x10_0").unwrap();
        assert!(rule.own.global);
        assert!(!rule.own.private);
        assert!(rule.own.public);
        assert!(!rule.other.global);
        assert!(!rule.other.private);
        assert!(!rule.other.public);
    }

    #[test]
    fn test_decode_rejects_short_input() {
        assert_eq!(Rule::decode("10101"), Err(DecodeRuleError::Malformed(5)));
        assert_eq!(Rule::decode(""), Err(DecodeRuleError::Malformed(0)));
    }

    #[test]
    fn test_decode_rejects_long_input() {
        assert_eq!(Rule::decode("1010101"), Err(DecodeRuleError::Malformed(7)));
    }

    #[test]
    fn test_side_selection() {
        let rule = Rule::decode("111000").unwrap();
        assert!(rule.side(true).global);
        assert!(!rule.side(false).global);
    }

    #[test]
    fn test_flags_by_scope() {
        let rule = Rule::decode("101010").unwrap();
        assert!(rule.own.scope(Scope::Global));
        assert!(!rule.own.scope(Scope::Private));
        assert!(rule.own.scope(Scope::Public));
        assert!(rule.other.scope(Scope::Private));
    }

    #[test]
    fn test_validate_encoded_rule() {
        assert!(validate_encoded_rule("110011").is_ok());
        assert!(validate_encoded_rule("11001").is_err());
        assert!(validate_encoded_rule("1100111").is_err());
    }
}
