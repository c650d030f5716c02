//! Property tests for argument tokenizing.

use proptest::prelude::*;
use switchyard::token::{tokenize, TokenKind, TERMINATOR};

// =============================================================================
// Strategies
// =============================================================================

fn argument() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z0-9._/]{0,8}",
        "-[a-zA-Z]{1,4}",
        "--[a-z-]{1,8}",
        Just("-".to_string()),
        Just("--".to_string()),
        Just(TERMINATOR.to_string()),
        any::<String>(),
    ]
}

fn argv() -> impl Strategy<Value = Vec<String>> {
    (argument(), prop::collection::vec(argument(), 0..12)).prop_map(|(first, rest)| {
        let mut args = vec![first];
        args.extend(rest);
        args
    })
}

// =============================================================================
// Shape
// =============================================================================

proptest! {
    #[test]
    fn non_empty_input_always_tokenizes(args in argv()) {
        prop_assert!(tokenize(args).is_ok());
    }

    #[test]
    fn one_token_per_argument_at_its_index(args in argv()) {
        let tokens = tokenize(args.clone()).unwrap();
        prop_assert_eq!(tokens.len(), args.len());
        for (position, token) in tokens.iter().enumerate() {
            prop_assert_eq!(token.index(), position);
        }
        prop_assert_eq!(tokens.raw(), args.as_slice());
    }

    #[test]
    fn option_names_round_trip_to_raw(args in argv()) {
        let tokens = tokenize(args.clone()).unwrap();
        for token in tokens.iter() {
            let raw = &args[token.index()];
            let rebuilt = match token.kind() {
                TokenKind::LongOption(name) => format!("--{}", name),
                TokenKind::ShortOption(short) => format!("-{}", short),
                TokenKind::OptionSet(shorts) => format!("-{}", shorts.iter().collect::<String>()),
                TokenKind::Parameter(value) => value.clone(),
            };
            prop_assert_eq!(&rebuilt, raw);
        }
    }
}

// =============================================================================
// Terminator
// =============================================================================

proptest! {
    #[test]
    fn active_and_passthrough_cover_everything_but_the_terminator(args in argv()) {
        let tokens = tokenize(args.clone()).unwrap();
        let active = tokens.active().len();
        let passthrough = tokens.passthrough().len();

        if tokens.is_terminated() {
            prop_assert_eq!(active + 1 + passthrough, args.len());
            prop_assert_eq!(args[active].as_str(), TERMINATOR);
            prop_assert!(args[1..active].iter().all(|arg| arg != TERMINATOR));
        } else {
            prop_assert_eq!(active, args.len());
            prop_assert_eq!(passthrough, 0);
        }
    }

    #[test]
    fn lookahead_never_crosses_the_terminator(args in argv()) {
        let tokens = tokenize(args).unwrap();
        let active = tokens.active().len();
        for index in 0..tokens.len() {
            if let Some(next) = tokens.after(index) {
                prop_assert!(next.index() < active);
                prop_assert_eq!(next.index(), index + 1);
            }
        }
    }
}
