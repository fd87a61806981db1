//! Matching engine behavior: option resolution, bundling, negative-number
//! disambiguation, nargs consumption, and end-of-stream finalization.

use argot::{
    Action, ArgSpec, ArgType, ErrorKind, Nargs, ParseOutcome, Parser, ParserConfig, Value,
};

fn parser(spec: argot::CommandSpec) -> Parser {
    Parser::new(spec, ParserConfig::default()).expect("spec should validate")
}

fn root_matches(outcome: ParseOutcome<'_>) -> argot::Matches {
    match outcome {
        ParseOutcome::Root(matches) => matches,
        other => panic!("expected a root outcome, got {other:?}"),
    }
}

#[test]
fn result_map_holds_exactly_the_supplied_and_defaulted_names() {
    let p = parser(
        argot::CommandSpec::new("app")
            .arg(ArgSpec::new("dir"))
            .arg(ArgSpec::new("mode").long("mode").default("fast"))
            .arg(ArgSpec::new("verbose").short('v').typed(ArgType::Bool)),
    );
    let m = root_matches(p.parse(&["src"]).unwrap());
    assert_eq!(m.get_str("dir"), Some("src"));
    assert_eq!(m.get_str("mode"), Some("fast"));
    // Absent optional without default: no placeholder key.
    assert!(!m.contains("verbose"));
    assert_eq!(m.len(), 2);
}

#[test]
fn long_option_beats_short_even_for_a_single_character() {
    let spec = argot::CommandSpec::new("app")
        .arg(ArgSpec::new("file").long("f"))
        .arg(ArgSpec::new("flag").short('f').typed(ArgType::Bool));
    let p = parser(spec);

    let m = root_matches(p.parse(&["--f", "x"]).unwrap());
    assert_eq!(m.get_str("file"), Some("x"));
    assert!(!m.contains("flag"));

    // Even a single-dash `-f` resolves through the long table first.
    let m = root_matches(p.parse(&["-f", "x"]).unwrap());
    assert_eq!(m.get_str("file"), Some("x"));
    assert!(!m.contains("flag"));
}

#[test]
fn bundled_flags_expand_when_every_character_is_a_flag() {
    let p = parser(
        argot::CommandSpec::new("app")
            .arg(ArgSpec::new("a").short('a').typed(ArgType::Bool))
            .arg(ArgSpec::new("b").short('b').typed(ArgType::Bool))
            .arg(ArgSpec::new("c").short('c').typed(ArgType::Bool)),
    );
    let m = root_matches(p.parse(&["-abc"]).unwrap());
    assert_eq!(m.get_bool("a"), Some(true));
    assert_eq!(m.get_bool("b"), Some(true));
    assert_eq!(m.get_bool("c"), Some(true));
}

#[test]
fn bundle_falls_back_to_attached_value_when_first_flag_takes_one() {
    let p = parser(
        argot::CommandSpec::new("app")
            .arg(ArgSpec::new("a").short('a'))
            .arg(ArgSpec::new("b").short('b').typed(ArgType::Bool))
            .arg(ArgSpec::new("c").short('c').typed(ArgType::Bool)),
    );
    let m = root_matches(p.parse(&["-abc"]).unwrap());
    assert_eq!(m.get_str("a"), Some("bc"));
    assert!(!m.contains("b"));
    assert!(!m.contains("c"));
}

#[test]
fn counted_flags_accumulate_through_a_bundle() {
    let p = parser(argot::CommandSpec::new("app").arg(
        ArgSpec::new("verbose").short('v').typed(ArgType::int()).action(Action::Count),
    ));
    let m = root_matches(p.parse(&["-vvv"]).unwrap());
    assert_eq!(m.get_int("verbose"), Some(3));
}

#[test]
fn attached_short_value_needs_no_space() {
    let p = parser(argot::CommandSpec::new("app").arg(ArgSpec::new("input").short('i')));
    let m = root_matches(p.parse(&["-ivalue"]).unwrap());
    assert_eq!(m.get_str("input"), Some("value"));
}

#[test]
fn negative_number_is_a_value_while_no_option_resembles_one() {
    let p = parser(
        argot::CommandSpec::new("app").arg(ArgSpec::new("n").typed(ArgType::int())),
    );
    let m = root_matches(p.parse(&["-5"]).unwrap());
    assert_eq!(m.get_int("n"), Some(-5));
}

#[test]
fn digit_short_option_makes_negative_numbers_unknown_arguments() {
    let p = parser(
        argot::CommandSpec::new("app")
            .arg(ArgSpec::new("n").typed(ArgType::int()).required(false))
            .arg(ArgSpec::new("three").short('3').typed(ArgType::Bool)),
    );
    let err = p.parse(&["-5"]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownArgument);
}

#[test]
fn numeric_long_option_makes_negative_numbers_unknown_arguments() {
    let p = parser(
        argot::CommandSpec::new("app")
            .arg(ArgSpec::new("n").typed(ArgType::int()).required(false))
            .arg(ArgSpec::new("seventeen").long("17").typed(ArgType::Bool)),
    );
    let err = p.parse(&["-5"]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownArgument);
}

#[test]
fn word_shaped_float_literals_are_not_numbers() {
    // A long option named `inf` must not make every dash-led number a
    // potential option.
    let p = parser(
        argot::CommandSpec::new("app")
            .arg(ArgSpec::new("n").typed(ArgType::int()).required(false))
            .arg(ArgSpec::new("inf").long("inf").typed(ArgType::Bool)),
    );
    let m = root_matches(p.parse(&["-5"]).unwrap());
    assert_eq!(m.get_int("n"), Some(-5));

    // And a stray `-inf` token is not a number-shaped positional.
    let p = parser(
        argot::CommandSpec::new("app").arg(ArgSpec::new("n").typed(ArgType::int()).required(false)),
    );
    let err = p.parse(&["-inf"]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownArgument);
}

#[test]
fn list_nargs_stops_at_the_next_option() {
    let p = parser(
        argot::CommandSpec::new("app")
            .arg(ArgSpec::new("x").short('x').typed(ArgType::int()).nargs(Nargs::List))
            .arg(ArgSpec::new("other").long("other").typed(ArgType::Bool)),
    );
    let m = root_matches(p.parse(&["-x", "1", "2", "--other"]).unwrap());
    assert_eq!(
        m.get_list("x"),
        Some(&[Value::Int(1), Value::Int(2)][..])
    );
    assert_eq!(m.get_bool("other"), Some(true));
}

#[test]
fn missing_required_positional_names_the_argument() {
    let p = parser(argot::CommandSpec::new("app").arg(ArgSpec::new("dir")));
    let err = p.parse(&Vec::<String>::new()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MissingArgument);
    assert!(err.to_string().contains("`dir`"));
}

#[test]
fn missing_required_optional_names_the_argument() {
    let p = parser(
        argot::CommandSpec::new("app").arg(ArgSpec::new("out").long("out").required(true)),
    );

    let m = root_matches(p.parse(&["--out", "a.txt"]).unwrap());
    assert_eq!(m.get_str("out"), Some("a.txt"));

    let err = p.parse(&Vec::<String>::new()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MissingArgument);
    assert!(err.to_string().contains("`out`"));
}

#[test]
fn boolean_options_consume_only_exact_literals() {
    let p = parser(
        argot::CommandSpec::new("app")
            .arg(ArgSpec::new("flag").short('b').typed(ArgType::Bool))
            .arg(ArgSpec::new("pos").required(false)),
    );

    let m = root_matches(p.parse(&["-b", "false"]).unwrap());
    assert_eq!(m.get_bool("flag"), Some(false));

    // Anything else leaves the stream untouched and the option is a flag.
    let m = root_matches(p.parse(&["-b", "x"]).unwrap());
    assert_eq!(m.get_bool("flag"), Some(true));
    assert_eq!(m.get_str("pos"), Some("x"));
}

#[test]
fn store_keeps_the_last_write() {
    let p = parser(argot::CommandSpec::new("app").arg(ArgSpec::new("mode").long("mode")));
    let m = root_matches(p.parse(&["--mode", "a", "--mode", "b"]).unwrap());
    assert_eq!(m.get_str("mode"), Some("b"));
}

#[test]
fn append_accumulates_in_order() {
    let p = parser(
        argot::CommandSpec::new("app")
            .arg(ArgSpec::new("tag").long("tag").action(Action::Append)),
    );
    let m = root_matches(p.parse(&["--tag", "a", "--tag", "b"]).unwrap());
    assert_eq!(
        m.get_list("tag"),
        Some(&[Value::Str("a".into()), Value::Str("b".into())][..])
    );
}

#[test]
fn append_const_accumulates_its_constant_in_order() {
    let p = parser(argot::CommandSpec::new("app").arg(
        ArgSpec::new("mode")
            .long("fast")
            .action(Action::AppendConst(Value::Str("fast".into()))),
    ));
    let m = root_matches(p.parse(&["--fast", "--fast"]).unwrap());
    assert_eq!(
        m.get_list("mode"),
        Some(&[Value::Str("fast".into()), Value::Str("fast".into())][..])
    );
}

#[test]
fn extend_splices_converted_lists() {
    let p = parser(argot::CommandSpec::new("app").arg(
        ArgSpec::new("pts")
            .long("pts")
            .typed(ArgType::int())
            .action(Action::Extend)
            .nargs(Nargs::List),
    ));
    let m = root_matches(p.parse(&["--pts", "1", "2", "--pts", "3"]).unwrap());
    assert_eq!(
        m.get_list("pts"),
        Some(&[Value::Int(1), Value::Int(2), Value::Int(3)][..])
    );
}

#[test]
fn maybe_takes_one_token_or_the_default() {
    let spec = argot::CommandSpec::new("app")
        .arg(
            ArgSpec::new("depth")
                .long("depth")
                .typed(ArgType::int())
                .nargs(Nargs::Maybe)
                .default(1i64),
        )
        .arg(ArgSpec::new("other").long("other").typed(ArgType::Bool));
    let p = parser(spec);

    let m = root_matches(p.parse(&["--depth", "4"]).unwrap());
    assert_eq!(m.get_int("depth"), Some(4));

    let m = root_matches(p.parse(&["--depth"]).unwrap());
    assert_eq!(m.get_int("depth"), Some(1));

    // An option boundary also triggers the default, without consumption.
    let m = root_matches(p.parse(&["--depth", "--other"]).unwrap());
    assert_eq!(m.get_int("depth"), Some(1));
    assert_eq!(m.get_bool("other"), Some(true));
}

#[test]
fn maybe_with_constant_uses_its_fallback() {
    let p = parser(argot::CommandSpec::new("app").arg(
        ArgSpec::new("jobs")
            .long("jobs")
            .typed(ArgType::int())
            .nargs(Nargs::MaybeWith(Value::Int(8))),
    ));
    let m = root_matches(p.parse(&["--jobs"]).unwrap());
    assert_eq!(m.get_int("jobs"), Some(8));
}

#[test]
fn constant_actions_never_consume_tokens() {
    let p = parser(
        argot::CommandSpec::new("app")
            .arg(
                ArgSpec::new("level")
                    .long("debug")
                    .action(Action::StoreConst(Value::Str("debug".into()))),
            )
            .arg(ArgSpec::new("pos").required(false)),
    );
    let m = root_matches(p.parse(&["--debug", "x"]).unwrap());
    assert_eq!(m.get_str("level"), Some("debug"));
    assert_eq!(m.get_str("pos"), Some("x"));
}

#[test]
fn exact_count_takes_n_tokens_and_reports_shortfalls() {
    let p = parser(argot::CommandSpec::new("app").arg(
        ArgSpec::new("pair").long("pair").typed(ArgType::int()).nargs(Nargs::Exact(2)),
    ));

    let m = root_matches(p.parse(&["--pair", "1", "2"]).unwrap());
    assert_eq!(
        m.get_list("pair"),
        Some(&[Value::Int(1), Value::Int(2)][..])
    );

    let err = p.parse(&["--pair", "1"]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    assert!(err.to_string().contains("expected 2"));
}

#[test]
fn all_consumes_the_rest_unconditionally() {
    let p = parser(argot::CommandSpec::new("app").arg(ArgSpec::new("rest").nargs(Nargs::All)));
    let m = root_matches(p.parse(&["a", "--weird", "-1"]).unwrap());
    assert_eq!(
        m.get_list("rest"),
        Some(
            &[
                Value::Str("a".into()),
                Value::Str("--weird".into()),
                Value::Str("-1".into())
            ][..]
        )
    );
}

#[test]
fn nonempty_list_requires_at_least_one_token() {
    let p = parser(
        argot::CommandSpec::new("app")
            .arg(ArgSpec::new("xs").short('x').nargs(Nargs::NonEmptyList))
            .arg(ArgSpec::new("other").long("other").typed(ArgType::Bool)),
    );
    let err = p.parse(&["-x", "--other"]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
}

#[test]
fn unknown_arguments_are_rejected() {
    let p = parser(argot::CommandSpec::new("app").arg(ArgSpec::new("dir").required(false)));
    let err = p.parse(&["x", "y"]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownArgument);
    assert!(err.to_string().contains("`y`"));
}
