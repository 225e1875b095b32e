// tests/call_tests.rs

mod common;

use common::{canon, program};

fn one(stmt: &str) -> String {
    program(&[stmt])
}

const FOO: &str = r#"[:vcall, [:@ident, "foo", [1, 0]]]"#;

// ---
// Calls
// ---

#[test]
fn receiverless_calls() {
    assert_eq!(canon(&program(&[FOO])), "s(:call, nil, :foo)");

    let with_args = program(&[
        r#"[:method_add_arg, [:fcall, [:@ident, "foo", [1, 0]]], [:arg_paren, [[:@int, "1", [1, 4]], [:@int, "2", [1, 7]]]]]"#,
    ]);
    assert_eq!(canon(&with_args), "s(:call, nil, :foo, s(:lit, 1), s(:lit, 2))");

    let empty_parens = program(&[r#"[:method_add_arg, [:fcall, [:@ident, "foo", [1, 0]]], [:arg_paren, nil]]"#]);
    assert_eq!(canon(&empty_parens), "s(:call, nil, :foo)");
}

#[test]
fn calls_with_receivers() {
    let dot = one(&format!(
        r#"[:method_add_arg, [:call, {FOO}, [:@period, ".", [1, 3]], [:@ident, "bar", [1, 4]]], [:arg_paren, [[:@int, "1", [1, 8]]]]]"#
    ));
    assert_eq!(canon(&dot), "s(:call, s(:call, nil, :foo), :bar, s(:lit, 1))");

    let safe = one(&format!(r#"[:call, {FOO}, [:@op, "&.", [1, 3]], [:@ident, "bar", [1, 5]]]"#));
    assert_eq!(canon(&safe), "s(:safe_call, s(:call, nil, :foo), :bar)");

    let colon = one(&format!(r#"[:call, {FOO}, :"::", [:@ident, "bar", [1, 5]]]"#));
    assert_eq!(canon(&colon), "s(:call, s(:call, nil, :foo), :bar)");

    let implicit = one(&format!(
        r#"[:method_add_arg, [:call, {FOO}, [:@period, ".", [1, 3]], :call], [:arg_paren, nil]]"#
    ));
    assert_eq!(canon(&implicit), "s(:call, s(:call, nil, :foo), :call)");
}

#[test]
fn commands() {
    let command = program(&[
        r#"[:command, [:@ident, "puts", [1, 0]], [[:@int, "1", [1, 5]], [:star, [:vcall, [:@ident, "a", [1, 9]]]], [:block_pass, [:vcall, [:@ident, "b", [1, 13]]]]]]"#,
    ]);
    assert_eq!(
        canon(&command),
        "s(:call, nil, :puts, s(:lit, 1), s(:splat, s(:call, nil, :a)), s(:block_pass, s(:call, nil, :b)))"
    );

    let command_call = one(&format!(
        r#"[:command_call, {FOO}, [:@period, ".", [1, 3]], [:@ident, "bar", [1, 4]], [[:vcall, [:@ident, "c", [1, 8]]]]]"#
    ));
    assert_eq!(canon(&command_call), "s(:call, s(:call, nil, :foo), :bar, s(:call, nil, :c))");
}

#[test]
fn keyword_arguments_become_a_trailing_hash() {
    let dump = program(&[
        r#"[:method_add_arg, [:fcall, [:@ident, "foo", [1, 0]]], [:arg_paren, [
            [:@int, "1", [1, 4]],
            [:bare_assoc_hash, [:assoc_new, [:@label, "k:", [1, 7]], [:@int, "2", [1, 10]]],
                               [:assoc_splat, [:vcall, [:@ident, "o", [1, 15]]]]]]]]"#,
    ]);
    assert_eq!(
        canon(&dump),
        "s(:call, nil, :foo, s(:lit, 1), s(:hash, s(:lit, :k), s(:lit, 2), s(:kwsplat, s(:call, nil, :o))))"
    );
}

#[test]
fn anonymous_block_pass_and_forwarding() {
    let dump = program(&[
        r#"[:method_add_arg, [:fcall, [:@ident, "foo", [1, 0]]], [:arg_paren, [[:block_pass, nil]]]]"#,
    ]);
    assert_eq!(canon(&dump), "s(:call, nil, :foo, s(:block_pass))");

    let forward = program(&[
        r#"[:method_add_arg, [:fcall, [:@ident, "foo", [1, 0]]], [:arg_paren, [[:args_forward]]]]"#,
    ]);
    assert_eq!(canon(&forward), "s(:call, nil, :foo, s(:forward_args))");
}

#[test]
fn index_and_operators() {
    let aref = one(&format!(r#"[:aref, {FOO}, [[:@int, "1", [1, 4]]]]"#));
    assert_eq!(canon(&aref), "s(:call, s(:call, nil, :foo), :[], s(:lit, 1))");

    let plus = program(&[r#"[:binary, [:@int, "1", [1, 0]], :+, [:@int, "2", [1, 4]]]"#]);
    assert_eq!(canon(&plus), "s(:call, s(:lit, 1), :+, s(:lit, 2))");

    let spaceship = one(&format!(r#"[:binary, {FOO}, :<=>, [:@int, "2", [1, 8]]]"#));
    assert_eq!(canon(&spaceship), "s(:call, s(:call, nil, :foo), :<=>, s(:lit, 2))");
}

#[test]
fn super_and_yield() {
    assert_eq!(canon(&program(&["[:zsuper]"])), "s(:zsuper)");

    let explicit = program(&[r#"[:super, [:arg_paren, [[:@int, "1", [1, 6]]]]]"#]);
    assert_eq!(canon(&explicit), "s(:super, s(:lit, 1))");

    let empty = program(&[r#"[:super, [:arg_paren, nil]]"#]);
    assert_eq!(canon(&empty), "s(:super)");

    assert_eq!(canon(&program(&["[:yield0]"])), "s(:yield)");

    let bare = program(&[r#"[:yield, [[:@int, "1", [1, 6]]]]"#]);
    assert_eq!(canon(&bare), "s(:yield, s(:lit, 1))");

    let parens = program(&[r#"[:yield, [:paren, [[:@int, "1", [1, 6]], [:@int, "2", [1, 9]]]]]"#]);
    assert_eq!(canon(&parens), "s(:yield, s(:lit, 1), s(:lit, 2))");
}

// ---
// Blocks
// ---

fn with_block(block: &str) -> String {
    one(&format!(
        r#"[:method_add_block, [:method_add_arg, [:fcall, [:@ident, "foo", [1, 0]]], []], {block}]"#
    ))
}

#[test]
fn block_without_params_has_zero() {
    let dump = with_block("[:brace_block, nil, [[:void_stmt]]]");
    assert_eq!(canon(&dump), "s(:iter, s(:call, nil, :foo), 0)");
}

#[test]
fn empty_pipes_are_empty_args() {
    let dump = with_block(
        "[:brace_block, [:block_var, [:params, nil, nil, nil, nil, nil, nil, nil], false], [[:void_stmt]]]",
    );
    assert_eq!(canon(&dump), "s(:iter, s(:call, nil, :foo), s(:args))");
}

#[test]
fn block_params_and_body() {
    let dump = with_block(
        r#"[:do_block, [:block_var, [:params, [[:@ident, "a", [1, 8]], [:@ident, "b", [1, 11]]], nil, nil, nil, nil, nil, nil], false],
            [:bodystmt, [[:var_ref, [:@ident, "a", [2, 2]]], [:var_ref, [:@ident, "b", [3, 2]]]], nil, nil, nil]]"#,
    );
    assert_eq!(
        canon(&dump),
        "s(:iter, s(:call, nil, :foo), s(:args, :a, :b), s(:block, s(:lvar, :a), s(:lvar, :b)))"
    );
}

#[test]
fn block_locals_trailing_comma_and_destructuring() {
    let locals = with_block(
        r#"[:brace_block, [:block_var, [:params, [[:@ident, "a", [1, 7]]], nil, nil, nil, nil, nil, nil],
            [[:@ident, "b", [1, 10]]]], [[:void_stmt]]]"#,
    );
    assert_eq!(canon(&locals), "s(:iter, s(:call, nil, :foo), s(:args, :a, s(:shadow, :b)))");

    let comma = with_block(
        r#"[:brace_block, [:block_var, [:params, [[:@ident, "a", [1, 7]]], nil, [:excessed_comma], nil, nil, nil, nil], false],
            [[:void_stmt]]]"#,
    );
    assert_eq!(canon(&comma), "s(:iter, s(:call, nil, :foo), s(:args, :a, nil))");

    let nested = with_block(
        r#"[:brace_block, [:block_var, [:params, [[:mlhs, [:@ident, "a", [1, 8]], [:@ident, "b", [1, 11]]]], nil, nil, nil, nil, nil, nil], false],
            [[:void_stmt]]]"#,
    );
    assert_eq!(canon(&nested), "s(:iter, s(:call, nil, :foo), s(:args, s(:masgn, :a, :b)))");
}

#[test]
fn block_on_command_call() {
    let dump = one(&format!(
        r#"[:method_add_block, [:call, {FOO}, [:@period, ".", [1, 3]], [:@ident, "each", [1, 4]]],
            [:brace_block, [:block_var, [:params, [[:@ident, "x", [1, 12]]], nil, nil, nil, nil, nil, nil], false],
            [[:var_ref, [:@ident, "x", [1, 15]]]]]]"#
    ));
    assert_eq!(
        canon(&dump),
        "s(:iter, s(:call, s(:call, nil, :foo), :each), s(:args, :x), s(:lvar, :x))"
    );
}

#[test]
fn lambdas() {
    let bare = program(&["[:lambda, [:params, nil, nil, nil, nil, nil, nil, nil], [[:void_stmt]]]"]);
    assert_eq!(canon(&bare), "s(:iter, s(:lambda), 0)");

    let empty = program(&[
        "[:lambda, [:paren, [:params, nil, nil, nil, nil, nil, nil, nil]], [[:void_stmt]]]",
    ]);
    assert_eq!(canon(&empty), "s(:iter, s(:lambda), s(:args))");

    let explicit = program(&[
        r#"[:lambda, [:paren, [:params, [[:@ident, "x", [1, 3]]], nil, nil, nil, nil, nil, nil]],
            [[:var_ref, [:@ident, "x", [1, 8]]]]]"#,
    ]);
    assert_eq!(canon(&explicit), "s(:iter, s(:lambda), s(:args, :x), s(:lvar, :x))");
}

#[test]
fn begin_and_end_blocks() {
    let begin = program(&[r#"[:BEGIN, [[:@int, "1", [1, 8]]]]"#]);
    assert_eq!(canon(&begin), "s(:iter, s(:preexe), 0, s(:lit, 1))");

    let end = program(&["[:END, [[:void_stmt]]]"]);
    assert_eq!(canon(&end), "s(:iter, s(:postexe), 0)");
}

#[test]
fn parenthesized_expressions() {
    let single = program(&[r#"[:paren, [[:@int, "1", [1, 1]]]]"#]);
    assert_eq!(canon(&single), "s(:lit, 1)");

    let empty = program(&["[:paren, [[:void_stmt]]]"]);
    assert_eq!(canon(&empty), "s(:nil)");

    let many = program(&[r#"[:paren, [[:@int, "1", [1, 1]], [:@int, "2", [1, 4]]]]"#]);
    assert_eq!(canon(&many), "s(:block, s(:lit, 1), s(:lit, 2))");
}
