use axo::{interpreter::evaluator::core::Interpreter, parse_source, run_source};

fn assert_success(src: &str) {
    if let Err(e) = run_source(src) {
        panic!("Script failed: {e}\n{src}");
    }
}

fn assert_failure(src: &str) {
    if run_source(src).is_ok() {
        panic!("Script succeeded but was expected to fail:\n{src}")
    }
}

#[test]
fn arithmetic_and_precedence() {
    assert_success("var x: int = 2 + 3 * 4; assert(x == 14, \"precedence\");");
    assert_success("var x: int = 7 / 2; assert(x == 3, \"integer division truncates\");");
    assert_success("var x: int = 7 % 3; assert(x == 1, \"remainder\");");
    assert_success("var x: int = (2 + 3) * 4; assert(x == 20, \"grouping\");");
    assert_success("var y: float = 1.5 + 2.25; assert(y == 3.75, \"float addition\");");
    assert_success("var y: float = 1.0 / 4.0; assert(y == 0.25, \"float division\");");
}

#[test]
fn integer_arithmetic_is_checked() {
    assert_failure("var x: int = 2147483647 + 1;");
    assert_failure("var x: int = 1 / 0;");
    assert_failure("var x: int = 1 % 0;");
    assert_failure("var x: int = 3000000000;");
}

#[test]
fn string_concatenation_and_equality() {
    assert_success("assert(\"foo\" + \"bar\" == \"foobar\", \"concat\");");
    assert_success("assert(1 + \"x\" == \"1x\", \"mixed + concatenates\");");
    assert_success("assert(1 + 2.5 == \"12.5\", \"int + float concatenates\");");
    // Equality compares string forms across tags.
    assert_success("assert(1 == \"1\", \"string-form equality\");");
    assert_success("assert(true == \"true\", \"bool against its string form\");");
    assert_success("assert([1, 2] == \"[1, 2]\", \"array string form\");");
    assert_success("assert(1 != 2, \"inequality\");");
}

#[test]
fn comparisons_require_matching_numeric_tags() {
    assert_success("assert(2 < 3 && 3 > 2 && 2 <= 2 && 3 >= 3, \"int comparisons\");");
    assert_success("assert(1.5 < 2.5, \"float comparison\");");
    assert_failure("var x: bool = 1 < 2.5;");
}

#[test]
fn logical_operators_evaluate_both_sides() {
    assert_success(
                   r#"
        var calls: int = 0;
        func bump() -> bool {
            calls = calls + 1;
            return true;
        }
        var r: bool = false && bump();
        assert(!r, "false and anything");
        assert(calls == 1, "right operand still evaluated");
        var s: bool = bump() || bump();
        assert(s, "or is true");
        assert(calls == 3, "both or operands evaluated");
    "#,
    );
}

#[test]
fn truthiness_per_variant() {
    assert_success("assert(!0, \"zero is falsy\");");
    assert_success("assert(!\"\", \"empty string is falsy\");");
    assert_success("assert(!0.0, \"zero float is falsy\");");
    assert_success("if (\"text\") { } else { error(\"non-empty string is truthy\"); }");
    assert_success("if ([1]) { } else { error(\"non-empty array is truthy\"); }");
    assert_success("if ({}) { error(\"empty object is falsy\"); }");
}

#[test]
fn unary_operators() {
    assert_success("assert(-5 + 5 == 0, \"negation\");");
    assert_success("assert(-(1.5) == 0.0 - 1.5, \"float negation\");");
    assert_failure("var x: any = -\"nope\";");
}

#[test]
fn typeof_prefers_declared_types() {
    assert_success("var x: int = 1; assert(typeof x == \"int\", \"declared int\");");
    assert_success("var a: [int] = [1]; assert(typeof a == \"[int]\", \"declared array spec\");");
    assert_success("type Age = int; var b: Age = 3; assert(typeof b == \"Age\", \"alias name\");");
    assert_success("func f() -> void { } assert(typeof f == \"function\", \"function binding\");");
    assert_success("assert(typeof 3.5 == \"float\", \"runtime tag for literals\");");
    assert_success("assert(typeof [1] == \"array\", \"runtime tag for arrays\");");
    // A stale nominal declaration falls back to the runtime tag.
    assert_success("var n: int = 1; n = \"s\"; assert(typeof n == \"string\", \"runtime tag wins\");");
}

#[test]
fn declared_types_check_initializers() {
    assert_failure("var x: int = \"s\";");
    assert_failure("var x: bool = 1;");
    assert_success("var x: any = \"anything\"; x = [1]; x = {};");
}

#[test]
fn union_types_gate_stores() {
    assert_success("var s: int|string = 1; s = \"ok\";");
    assert_failure("var s: int|string = 1; s = \"ok\"; s = true;");
    assert_failure("var s: int|string = true;");
}

#[test]
fn nominal_stores_are_unchecked() {
    // Writes through a plain nominal declaration skip the matcher; only
    // initialization and complex specs are gated.
    assert_success("var x: int = 1; x = \"oops\"; assert(x == \"oops\", \"store skew\");");
}

#[test]
fn tuple_types_match_by_slot() {
    assert_success("var p: [int,string] = [1, \"a\"];");
    assert_failure("var p: [int,string] = [1, 2];");
    assert_failure("var p: [int,string] = [1, \"a\", 2];");
}

#[test]
fn array_and_object_specs_nest() {
    assert_success("var a: [int|string] = [1, \"two\", 3];");
    assert_failure("var a: [int|string] = [1, true];");
    assert_success("var pts: [{x:int}] = [{x: 1}, {x: 2, y: 3}];");
    assert_failure("var pts: [{x:int}] = [{y: 1}];");
    assert_success("var o: {name:string,age:int} = {name: \"ann\", age: 3, extra: true};");
    assert_failure("var o: {name:string,age:int} = {name: \"ann\"};");
    assert_success("var n: {p:{x:int},tag:\"pt\"} = {p: {x: 1}, tag: \"pt\"};");
}

#[test]
fn literal_types() {
    assert_success("var c: \"red\"|\"blue\" = \"red\"; c = \"blue\";");
    assert_failure("var c: \"red\"|\"blue\" = \"red\"; c = \"green\";");
    assert_success("var d: 1|2 = 1; d = 2;");
    assert_failure("var d: 1|2 = 1; d = 3;");
    assert_success("var f: true|\"off\" = true; f = \"off\";");
}

#[test]
fn type_aliases_resolve_recursively() {
    assert_success("type Id = int|string; var x: Id = 1; x = \"a\";");
    assert_failure("type Id = int|string; var x: Id = true;");
    assert_success("type Ids = [Id]; type Id = int|string; var xs: Ids = [1, \"a\"];");
}

#[test]
fn functions_and_first_class_values() {
    assert_success("func add(a: int, b: int) -> int { return a + b; } assert(add(2, 3) == 5, \"call\");");
    assert_success("func f(x: int) -> int { return x + 1; } var g: func = f; assert(g(41) == 42, \"through binding\");");
    assert_success("var f: (int)->int = func(x: int) -> int { return x * 2; }; assert(f(21) == 42, \"literal\");");
    assert_success("func fib(n: int) -> int { if (n < 2) { return n; } return fib(n - 1) + fib(n - 2); } assert(fib(10) == 55, \"recursion\");");
    assert_success("func nothing() -> void { } assert(nothing() == \"\", \"no return yields empty string\");");
}

#[test]
fn call_errors() {
    assert_failure("func h(a: int) -> int { return a; } h(1, 2);");
    assert_failure("missing();");
    assert_failure("var n: int = 1; n(2);");
}

#[test]
fn if_else_chains() {
    assert_success(
                   r#"
        func grade(n: int) -> string {
            if (n > 89) { return "a"; }
            else if (n > 79) { return "b"; }
            else { return "c"; }
        }
        assert(grade(95) == "a", "then branch");
        assert(grade(85) == "b", "else-if branch");
        assert(grade(50) == "c", "else branch");
    "#,
    );
}

#[test]
fn while_loops_with_break_and_continue() {
    assert_success(
                   r#"
        var sum: int = 0;
        var i: int = 0;
        while (i < 10) {
            i = i + 1;
            if (i % 2 == 0) { continue; }
            if (i > 7) { break; }
            sum = sum + i;
        }
        assert(sum == 1 + 3 + 5 + 7, "odd values below the break");
    "#,
    );
}

#[test]
fn for_loops() {
    assert_success(
                   r#"
        var sum: int = 0;
        for (var i: int = 0; i < 5; i = i + 1) {
            sum = sum + i;
        }
        assert(sum == 10, "accumulated loop variable");
    "#,
    );
    // `continue` still runs the update expression.
    assert_success(
                   r#"
        var hits: int = 0;
        for (var i: int = 0; i < 6; i = i + 1) {
            if (i % 2 == 1) { continue; }
            hits = hits + 1;
        }
        assert(hits == 3, "even iterations only");
    "#,
    );
}

#[test]
fn counter_loops_match_interpreted_results() {
    // These shapes are eligible for the closed-form accelerator; the final
    // values must equal what interpretation produces.
    assert_success(
                   r#"
        var i: int = 0;
        var n: int = 0;
        while (i < 1000) {
            n = n + 2;
            i = i + 1;
        }
        assert(n == 2000, "accumulator");
        assert(i == 1000, "counter lands on the limit");
    "#,
    );
    assert_success(
                   r#"
        var i: int = 1;
        while (i < 10) {
            i = i + 2;
        }
        assert(i == 11, "stride overshoots the limit");
    "#,
    );
    assert_success(
                   r#"
        var i: int = 0;
        while (10 > i) {
            i = i + 1;
        }
        assert(i == 10, "reversed comparison");
    "#,
    );
    assert_success(
                   r#"
        var k: int = 0;
        for (var j: int = 0; j < 10; j = j + 3) {
            k = k + 1;
        }
        assert(k == 4, "ceil(10 / 3) iterations");
    "#,
    );
}

#[test]
fn switch_falls_through_until_break() {
    assert_success(
                   r#"
        var out: string = "";
        switch (1) {
            case 1: out = out + "a";
            case 2: out = out + "b"; break;
            default: out = out + "c";
        }
        assert(out == "ab", "match then fall through to break");
    "#,
    );
    assert_success(
                   r#"
        var out: string = "";
        switch (9) {
            case 1: out = out + "a";
            default: out = out + "c";
        }
        assert(out == "c", "default when nothing matched");
    "#,
    );
    assert_success(
                   r#"
        var out: string = "";
        switch ("b") {
            case "a": out = out + "a";
            case "b": out = out + "b";
            case "c": out = out + "c"; break;
        }
        assert(out == "bc", "string discriminant with fallthrough");
    "#,
    );
    // The discriminant and cases compare by string form.
    assert_success(
                   r#"
        var out: string = "";
        switch (1) {
            case "1": out = "matched"; break;
        }
        assert(out == "matched", "string form comparison");
    "#,
    );
}

#[test]
fn throw_try_catch_finally() {
    assert_success(
                   r#"
        var log: string = "";
        try {
            throw "boom";
        } catch (e) {
            log = log + "c:" + e;
        } finally {
            log = log + ";f";
        }
        assert(log == "c:boom;f", "catch then finally");
    "#,
    );
    assert_success(
                   r#"
        try {
            throw {code: 404};
        } catch (e) {
            assert(e.code == 404, "thrown values keep their shape");
        }
    "#,
    );
    assert_failure("throw \"unhandled\";");
    // Only `throw` is catchable; runtime errors stay fatal.
    assert_failure("try { missingVariable; } catch (e) { }");
    assert_failure("try { error(\"fatal\"); } catch (e) { }");
}

#[test]
fn finally_runs_exactly_once_per_exit_path() {
    // Return path (scenario: the function still returns its value).
    assert_success(
                   r#"
        var trace: string = "";
        func f() -> int {
            try {
                return 1;
            } finally {
                trace = trace + "f";
            }
        }
        assert(f() == 1, "return value survives finally");
        assert(trace == "f", "finally ran once");
    "#,
    );
    // Break path.
    assert_success(
                   r#"
        var count: int = 0;
        var i: int = 0;
        while (i < 5) {
            i = i + 1;
            try {
                break;
            } finally {
                count = count + 1;
            }
        }
        assert(count == 1, "finally on the break path");
        assert(i == 1, "loop exited on first iteration");
    "#,
    );
    // Throw path: finally runs before the value reaches the outer catch.
    assert_success(
                   r#"
        var log: string = "";
        try {
            try {
                throw "x";
            } finally {
                log = log + "inner";
            }
        } catch (e) {
            log = log + ";outer:" + e;
        }
        assert(log == "inner;outer:x", "finally before outer catch");
    "#,
    );
}

#[test]
fn arrays_index_and_mutate() {
    assert_success("var a: [int] = [1, 2, 3]; assert(a[0] == 1 && a[2] == 3, \"reads\");");
    assert_success("var a: [int] = [1, 2]; a[0] = 9; assert(a[0] == 9, \"index store\");");
    assert_failure("var a: [int] = [1, 2]; a[5];");
    assert_failure("var a: [int] = [1, 2]; a[-1];");
    assert_failure("var a: [int] = [1, 2]; a[1] = \"s\";");
    assert_success("var a: [int] = []; push(a, 1); push(a, 2); assert(len(a) == 2, \"push grows\");");
    assert_failure("var a: [int] = []; push(a, \"x\");");
    assert_failure("push([1], 2);");
    assert_success("var a: [int] = [1, 2]; assert(pop(a) == \"2\", \"pop returns string form\"); assert(len(a) == 1, \"pop shrinks\");");
    assert_success("var empty: [int] = []; assert(pop(empty) == \"\", \"pop on empty\");");
}

#[test]
fn pop_then_push_restores_string_form() {
    assert_success(
                   r#"
        var a: any = [1, 2];
        var p: string = pop(a);
        push(a, p);
        assert(join(a, ",") == "1,2", "string form restored");
    "#,
    );
}

#[test]
fn arrays_share_by_reference() {
    assert_success(
                   r#"
        var a: [int] = [1];
        var b: any = a;
        push(a, 2);
        assert(len(b) == 2, "aliased binding sees the push");
        b[0] = 9;
        assert(a[0] == 9, "mutation through the alias");
    "#,
    );
}

#[test]
fn array_helpers() {
    assert_success("assert(join(slice([1, 2, 3, 4], 1, 3), \",\") == \"2,3\", \"slice\");");
    assert_success("assert(join(slice([1, 2, 3], 1), \",\") == \"2,3\", \"slice to the end\");");
    assert_success("assert(join(reverse([1, 2]), \",\") == \"2,1\", \"reverse\");");
    assert_success("assert(join(sort([3, 1, 2]), \",\") == \"1,2,3\", \"sort\");");
    assert_success("assert(join(sort([2, 10]), \",\") == \"10,2\", \"sort is by string form\");");
    assert_success("assert(find([4, 5, 6], 5) == 1, \"find\");");
    assert_success("assert(find([4, 5], 9) == 0 - 1, \"find misses\");");
    assert_success("assert(includes([4, 5], 5), \"includes\");");
    assert_success("assert(!includes([4, 5], 9), \"includes misses\");");
    assert_success("assert(len(\"abc\") == 3, \"len on strings\");");
    assert_failure("len(1);");
}

#[test]
fn objects_fields_and_helpers() {
    assert_success("var o: object = {a: 1}; assert(o.a == 1, \"field read\");");
    assert_success("var o: object = {}; o.k = 5; assert(o.k == 5, \"field store\");");
    assert_success("var o: object = {}; o[\"k\" + 1] = 7; assert(o.k1 == 7, \"index store by string form\");");
    assert_success("var o: object = {a: 1}; assert(o[\"a\"] == 1, \"index read\");");
    assert_success("var o: object = {}; assert(o.missing == \"\", \"missing field reads empty\");");
    assert_success("var o: object = {b: 1, a: 2}; assert(join(keys(o), \",\") == \"a,b\", \"sorted keys\");");
    assert_success("var o: object = {b: 1, a: 2}; assert(join(values(o), \",\") == \"2,1\", \"values in key order\");");
    assert_success("var o: object = {a: 1}; assert(hasKey(o, \"a\") && !hasKey(o, \"b\"), \"hasKey\");");
    assert_success("var m: object = merge({a: 1, b: 1}, {b: 2}); assert(m.a == 1 && m.b == 2, \"merge overwrites\");");
    assert_success(
                   r#"
        var o1: object = {x: 1};
        var o2: any = clone(o1);
        o2.x = 2;
        assert(o1.x == 1, "clone detaches the top level");
    "#,
    );
    assert_failure("var n: int = 1; n.field;");
}

#[test]
fn string_helpers() {
    assert_success("assert(substr(\"hello\", 1, 3) == \"ell\", \"substr\");");
    assert_success("assert(substr(\"hi\", 5, 1) == \"\", \"substr out of range\");");
    assert_success("assert(toUpper(\"abc\") == \"ABC\" && toLower(\"ABC\") == \"abc\", \"case\");");
    assert_success("assert(indexOf(\"hello\", \"lo\") == 3, \"indexOf\");");
    assert_success("assert(indexOf(\"hello\", \"zz\") == 0 - 1, \"indexOf misses\");");
    assert_success("assert(contains(\"hello\", \"ell\"), \"contains\");");
    assert_success("assert(startsWith(\"hello\", \"he\") && endsWith(\"hello\", \"lo\"), \"affixes\");");
    assert_success("assert(trim(\"  x \") == \"x\", \"trim\");");
    assert_success("assert(repeat(\"ab\", 3) == \"ababab\", \"repeat\");");
    assert_success("assert(replace(\"aaa\", \"a\", \"b\") == \"bbb\", \"replace\");");
    assert_success("assert(join(split(\"a,b,c\", \",\"), \"-\") == \"a-b-c\", \"split\");");
    assert_success("assert(len(split(\"abc\", \"\")) == 3, \"empty separator splits chars\");");
    assert_success("assert(charAt(\"abc\", 1) == \"b\", \"charAt\");");
    assert_success("assert(charAt(\"abc\", 9) == \"\", \"charAt out of range\");");
    assert_success("assert(charCodeAt(\"A\", 0) == 65, \"charCodeAt\");");
    assert_success("assert(charCodeAt(\"A\", 9) == 0 - 1, \"charCodeAt out of range\");");
    assert_success("assert(\"abc\"[1] == \"b\", \"string indexing\");");
    assert_failure("\"abc\"[5];");
}

#[test]
fn string_interpolation() {
    assert_success("var x: int = 41; assert(\"v=${x + 1}\" == \"v=42\", \"expression splice\");");
    assert_success("assert(\"${1}${2}\" == \"12\", \"adjacent fragments\");");
    assert_success("var name: string = \"axo\"; assert(\"hi ${name}!\" == \"hi axo!\", \"identifier splice\");");
    // An unmatched brace keeps the raw text for the remainder.
    assert_success("assert(\"a${b\" == \"a${b\", \"unmatched brace\");");
    // A fragment that fails to evaluate is a real error.
    assert_failure("var s: string = \"${missing}\";");
}

#[test]
fn conversions() {
    assert_success("assert(toInt(\"42\") == 42, \"string to int\");");
    assert_success("assert(toInt(3.9) == 3, \"float truncates\");");
    assert_success("assert(toInt(\"3.5\") == 3, \"numeric string through float\");");
    assert_success("assert(toInt(true) == 1, \"bool to int\");");
    assert_success("assert(toFloat(\"2.5\") == 2.5, \"string to float\");");
    assert_success("assert(toFloat(2) == 2.0, \"int to float\");");
    assert_success("assert(!toBool(0) && toBool(\"x\"), \"truthiness conversion\");");
    assert_success("assert(toString(true) == \"true\", \"bool string form\");");
    assert_success("assert(toString([1, 2]) == \"[1, 2]\", \"array string form\");");
    assert_failure("toInt([1]);");
}

#[test]
fn math_builtins() {
    assert_success("assert(abs(0 - 3) == 3, \"abs int\");");
    assert_success("assert(abs(0.0 - 1.5) == 1.5, \"abs float\");");
    assert_success("assert(floor(3.7) == 3 && ceil(3.2) == 4 && round(3.5) == 4, \"rounding\");");
    assert_success("assert(floor(3) == 3, \"rounding passes ints through\");");
    assert_success("assert(min(2, 5) == 2 && max(2, 5) == 5, \"min and max\");");
    assert_success("assert(min(2.5, 2) == 2.0, \"mixed operands go float\");");
    assert_success("assert(clamp(7, 0, 5) == 5 && clamp(0 - 2, 0, 5) == 0, \"clamp\");");
    assert_success("assert(pow(2, 10) == 1024, \"integer pow\");");
    assert_success("assert(pow(2.0, 0.5) > 1.41 && pow(2.0, 0.5) < 1.42, \"float pow\");");
    assert_success("assert(sqrt(9) == 3, \"sqrt coerces int up\");");
    assert_success("assert(sin(0) == 0 && cos(0) == 1, \"trig at zero\");");
    assert_success("assert(atan2(0, 1) == 0, \"atan2\");");
    assert_success("assert(log(1) == 0 && log10(10.0) == 1, \"logarithms\");");
    assert_success("assert(exp(0) == 1, \"exp\");");
    assert_success("assert(lerp(0.0, 10.0, 0.5) == 5, \"lerp\");");
    assert_failure("pow(2, 40);");
    assert_failure("sin(\"x\");");
}

#[test]
fn random_stays_in_range() {
    assert_success(
                   r#"
        var r: float = random();
        assert(r >= 0.0 && r < 1.0, "unit interval");
        var n: int = random(10);
        assert(n >= 0 && n < 10, "bounded int");
        var m: int = random(5, 6);
        assert(m == 5, "single-value range");
    "#,
    );
}

#[test]
fn assignment_is_an_expression() {
    assert_success("var a: int = 0; var b: int = 0; a = b = 5; assert(a == 5 && b == 5, \"chain\");");
}

#[test]
fn const_is_not_enforced() {
    assert_success("const k: int = 1; k = 2; assert(k == 2, \"permissive const\");");
}

#[test]
fn function_specs_ignore_arity() {
    // Any function matches `func` and any parenthesized spec.
    assert_success("func f(a: int, b: int) -> int { return a + b; } var g: ()->void = f; assert(g(1, 2) == 3, \"arity unchecked by the matcher\");");
}

#[test]
fn programs_run_synchronously_in_the_caller() {
    assert_success(
                   r#"
        var counter: int = 0;
        program ticker(n: int) {
            counter = counter + n;
        }
        ticker(5);
        assert(counter == 5, "sync program mutates the caller");
    "#,
    );
    assert_failure("program p(a: int) { } p();");
}

#[test]
fn awaited_programs_are_isolated() {
    assert_success(
                   r#"
        var counter: int = 0;
        program bg(n: int) {
            counter = counter + n;
        }
        await bg(5);
        assert(counter == 0, "worker mutations are invisible after join");
    "#,
    );
    // The worker gets deep copies: even shared collections stay caller-local.
    assert_success(
                   r#"
        var data: [int] = [1];
        program bg(xs: [int]) {
            push(xs, 2);
        }
        await bg(data);
        assert(len(data) == 1, "arguments deep-copied on dispatch");
    "#,
    );
    assert_success("program quiet() { } assert(await quiet() == \"\", \"await yields empty\");");
    assert_failure("program boom() { error(\"bad\"); } await boom();");
}

#[test]
fn await_on_non_programs_evaluates_in_place() {
    assert_success("assert(await (1 + 1) == 2, \"plain expression\");");
}

#[test]
fn clock_and_sleep() {
    assert_success(
                   r#"
        var t0: int = millis();
        sleep(1);
        var t1: int = millis();
        assert(t1 >= t0, "clock does not go backwards");
    "#,
    );
}

#[test]
fn stray_control_flow_is_fatal() {
    assert_failure("break;");
    assert_failure("continue;");
    assert_failure("return 1;");
}

#[test]
fn nested_blocks_shadow_and_restore() {
    assert_success(
                   r#"
        var x: int = 1;
        {
            var x: int = 2;
            assert(x == 2, "inner shadow");
        }
        assert(x == 1, "outer restored");
    "#,
    );
}

#[test]
fn parse_errors_carry_positions() {
    let err = parse_source("var x: int = ;").unwrap_err();
    assert_eq!(err.line(), 1);

    let err = parse_source("1 = 2;").unwrap_err();
    assert!(err.to_string().contains("assignment target"));

    let err = parse_source("var x: int = 1 @ 2;").unwrap_err();
    assert!(err.to_string().contains("Unknown character"));

    let err = parse_source("func f(").unwrap_err();
    assert!(err.to_string().contains("end of input"));

    // Positions point at the offending token.
    let err = parse_source("var x: int = 1;\nvar y: = 2;").unwrap_err();
    assert_eq!(err.line(), 2);
}

#[test]
fn scope_stack_depth_is_balanced() {
    let source = r#"
        func f(x: int) -> int {
            if (x > 0) { return x; }
            return 0 - x;
        }
        for (var i: int = 0; i < 3; i = i + 1) {
            f(i);
        }
        var caught: string = "";
        try { throw "x"; } catch (e) { caught = e; } finally { caught = caught + "!"; }
        assert(caught == "x!", "try ran");
    "#;
    let program = parse_source(source).expect("parse");
    let mut interpreter = Interpreter::new();
    interpreter.run(&program).expect("run");
    assert_eq!(interpreter.env.depth(), 1, "scope stack returned to its starting depth");
}

#[test]
fn empty_and_comment_only_sources() {
    assert_success("");
    assert_success("// nothing but a comment\n");
    assert_success("// leading comment\nvar x: int = 1; assert(x == 1, \"code after comment\");");
}

#[test]
fn declarations_without_initializers_default() {
    assert_success("var x: int; assert(x == 0, \"ints default to zero\");");
    assert_success("var o: object; assert(o == \"{}\", \"objects default to empty\");");
}

#[test]
fn statements_require_semicolons() {
    assert!(parse_source("var x: int = 1").is_err());
    assert!(parse_source("return").is_err());
}

#[test]
fn builtins_resolve_before_user_functions() {
    assert_success("func len(x: int) -> int { return 99; } assert(len(\"abc\") == 3, \"builtin wins\");");
}

#[test]
fn higher_order_callees() {
    assert_success(
                   r#"
        var fns: any = [func(x: int) -> int { return x + 1; }];
        assert(fns[0](41) == 42, "call through an index expression");
    "#,
    );
    assert_success(
                   r#"
        func make() -> func {
            return func(x: int) -> int { return x * 3; };
        }
        var triple: func = make();
        assert(triple(2) == 6, "function returned from a function");
    "#,
    );
    assert_success(
                   r#"
        func apply(f: (int)->int, x: int) -> int { return f(x); }
        func inc(x: int) -> int { return x + 1; }
        assert(apply(inc, 41) == 42, "function passed as argument");
    "#,
    );
}

#[test]
fn nested_collections_chain() {
    assert_success(
                   r#"
        var cfg: object = {server: {port: 8080}, tags: ["a", "b"]};
        assert(cfg.server.port == 8080, "chained field access");
        assert(cfg.tags[0] == "a", "field then index");
        cfg.server.port = 9090;
        assert(cfg.server.port == 9090, "chained field store");
        cfg.tags[1] = "c";
        assert(join(cfg.tags, ",") == "a,c", "index store through a field");
    "#,
    );
}

#[test]
fn object_string_form_is_sorted_and_stable() {
    assert_success("assert({b: 1, a: 2} == \"{a: 2, b: 1}\", \"sorted field order\");");
}

#[test]
fn throw_unwinds_through_calls() {
    assert_success(
                   r#"
        func risky() -> void { throw "inner"; }
        var caught: string = "";
        try {
            risky();
        } catch (e) {
            caught = e;
        }
        assert(caught == "inner", "throw crossed the call boundary");
    "#,
    );
}

#[test]
fn interpolation_runs_calls_and_nested_lookups() {
    assert_success(
                   r#"
        func two() -> int { return 2; }
        assert("${two()}" == "2", "call in a fragment");
        var o: object = {n: 7};
        assert("n is ${o.n}" == "n is 7", "field access in a fragment");
    "#,
    );
}

#[test]
fn repl_style_reuse_keeps_definitions() {
    let mut interpreter = Interpreter::new();
    let first = parse_source("func twice(x: int) -> int { return x * 2; }").expect("parse");
    interpreter.run(&first).expect("define");
    let second = parse_source("assert(twice(4) == 8, \"persisted definition\");").expect("parse");
    interpreter.run(&second).expect("call");
}
