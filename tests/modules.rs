use std::{fs, path::PathBuf};

use axo::run_source;

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

/// A fresh fixture directory per test, so tests can run in parallel without
/// touching each other's files.
fn fixture_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("axo-module-tests-{}-{name}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).expect("create fixture dir");
    dir
}

#[test]
fn named_exports_bind_and_modules_run_once() {
    let dir = fixture_dir("named");
    let counter = dir.join("count.txt");
    fs::write(&counter, "0").expect("seed counter");

    let module = dir.join("m.axo");
    fs::write(&module,
              format!(
        r#"
        var ran: string = read("{counter}");
        write("{counter}", toInt(ran) + 1);
        export func add(a: int, b: int) -> int {{ return a + b; }}
        "#,
        counter = counter.display()
    )).expect("write module");

    let script = format!(
                         r#"
        import {{add}} from "{m}";
        import {{add}} from "{m}";
        assert(add(2, 3) == 5, "imported function works");
        assert(read("{counter}") == "1", "module executed exactly once");
        "#,
                         m = module.display(),
                         counter = counter.display()
    );
    assert_success(&script);
}

#[test]
fn default_exports() {
    let dir = fixture_dir("default");
    let module = dir.join("greeter.axo");
    fs::write(&module,
              "export default func greet() -> string { return \"hi\"; }\n").expect("write module");

    let script = format!(
                         r#"
        import g from "{m}";
        assert(g() == "hi", "default function export");
        "#,
                         m = module.display()
    );
    assert_success(&script);

    let value_module = dir.join("answer.axo");
    fs::write(&value_module, "export default 42;\n").expect("write module");
    let script = format!(
                         r#"
        import answer from "{m}";
        assert(answer == 42, "default value export");
        "#,
                         m = value_module.display()
    );
    assert_success(&script);
}

#[test]
fn missing_exports_are_errors() {
    let dir = fixture_dir("missing");
    let module = dir.join("m.axo");
    fs::write(&module, "export var x: int = 1;\n").expect("write module");

    assert_failure(&format!("import {{nope}} from \"{}\";", module.display()));
    assert_failure(&format!("import anything from \"{}\";", module.display()));
}

#[test]
fn use_runs_side_effects_in_isolation() {
    let dir = fixture_dir("use");
    let counter = dir.join("count.txt");
    fs::write(&counter, "0").expect("seed counter");

    let module = dir.join("fx.axo");
    fs::write(&module,
              format!(
        r#"
        var ran: string = read("{counter}");
        write("{counter}", toInt(ran) + 1);
        export var leaked: int = 7;
        "#,
        counter = counter.display()
    )).expect("write module");

    // The module runs once, even across use + import, and its exports are
    // recorded; but `use` itself binds nothing.
    let script = format!(
                         r#"
        use "{m}";
        use "{m}";
        assert(read("{counter}") == "1", "side effects ran once");
        import {{leaked}} from "{m}";
        assert(leaked == 7, "exports recorded without re-execution");
        assert(read("{counter}") == "1", "import did not re-run the module");
        "#,
                         m = module.display(),
                         counter = counter.display()
    );
    assert_success(&script);

    let leaky = format!(
                        r#"
        use "{m}";
        var x: int = leaked;
        "#,
                        m = module.display()
    );
    assert_failure(&leaky);
}

#[test]
fn json_imports_bind_raw_contents() {
    let dir = fixture_dir("json");
    let data = dir.join("config.json");
    fs::write(&data, "{\"name\": \"axo\"}").expect("write json");

    let script = format!(
                         r#"
        import cfg from "{data}";
        assert(contains(cfg, "axo"), "raw contents bound under the import name");
        "#,
                         data = data.display()
    );
    assert_success(&script);

    // Without a default name the file stem is the binding.
    let script = format!(
                         r#"
        import "{data}";
        assert(contains(config, "axo"), "bound under the file stem");
        "#,
                         data = data.display()
    );
    assert_success(&script);

    assert_failure(&format!("import {{k}} from \"{}\";", data.display()));
}

#[test]
fn extensionless_and_index_resolution() {
    let dir = fixture_dir("resolve");
    fs::write(dir.join("lib.axo"),
              "export func g() -> int { return 4; }\n").expect("write module");
    fs::create_dir_all(dir.join("pkg")).expect("create pkg");
    fs::write(dir.join("pkg").join("index.axo"),
              "export func f() -> int { return 9; }\n").expect("write index");

    let script = format!(
                         r#"
        import {{g}} from "{dir}/lib";
        import {{f}} from "{dir}/pkg";
        assert(g() == 4, "extensionless resolves to lib.axo");
        assert(f() == 9, "directory resolves to index.axo");
        "#,
                         dir = dir.display()
    );
    assert_success(&script);

    assert_failure(&format!("import {{f}} from \"{}/absent\";", dir.display()));
    assert_failure(&format!("import \"{}/lib.txt\";", dir.display()));
}

#[test]
fn relative_imports_resolve_against_the_importing_module() {
    let dir = fixture_dir("relative");
    let pkg = dir.join("pkg");
    fs::create_dir_all(&pkg).expect("create pkg");
    fs::write(pkg.join("helper.axo"),
              "export func h() -> int { return 1; }\n").expect("write helper");
    fs::write(pkg.join("main.axo"),
              "import {h} from \"./helper.axo\";\nexport func wrapped() -> int { return h() + 1; }\n")
        .expect("write main");

    let script = format!(
                         r#"
        import {{wrapped}} from "{main}";
        assert(wrapped() == 2, "nested relative import");
        "#,
                         main = pkg.join("main.axo").display()
    );
    assert_success(&script);
}

#[test]
fn import_cycles_are_broken_at_reentry() {
    let dir = fixture_dir("cycle");
    fs::write(dir.join("a.axo"),
              "import \"./b.axo\";\nexport func fa() -> int { return 1; }\n").expect("write a");
    fs::write(dir.join("b.axo"),
              "import \"./a.axo\";\nexport func fb() -> int { return 2; }\n").expect("write b");

    let script = format!(
                         r#"
        import {{fa}} from "{dir}/a.axo";
        import {{fb}} from "{dir}/b.axo";
        assert(fa() + fb() == 3, "both modules loaded despite the cycle");
        "#,
                         dir = dir.display()
    );
    assert_success(&script);
}

#[test]
fn named_export_lists_copy_scope_bindings() {
    let dir = fixture_dir("named-list");
    let module = dir.join("pair.axo");
    fs::write(&module,
              "var low: int = 1;\nvar high: int = 9;\nexport {low, high};\n").expect("write module");

    let script = format!(
                         r#"
        import {{low, high}} from "{m}";
        assert(low == 1 && high == 9, "both names bound");
        "#,
                         m = module.display()
    );
    assert_success(&script);
}

#[test]
fn exported_type_aliases_join_the_registry() {
    let dir = fixture_dir("types");
    let module = dir.join("colors.axo");
    fs::write(&module, "export type Color = \"red\"|\"blue\";\n").expect("write module");

    let script = format!(
                         r#"
        import "{m}";
        var c: Color = "red";
        c = "blue";
        assert(c == "blue", "alias usable after loading");
        "#,
                         m = module.display()
    );
    assert_success(&script);

    let bad = format!(
                      r#"
        import "{m}";
        var c: Color = "green";
        "#,
                      m = module.display()
    );
    assert_failure(&bad);
}

#[test]
fn imported_modules_share_the_interpreter_state() {
    // Imports execute in the caller's interpreter, so a module's top-level
    // declarations are visible afterwards even without an export.
    let dir = fixture_dir("shared");
    let module = dir.join("state.axo");
    fs::write(&module,
              "var shared_counter: int = 5;\nfunc bump_shared() -> int { shared_counter = shared_counter + 1; return shared_counter; }\n")
        .expect("write module");

    let script = format!(
                         r#"
        import "{m}";
        assert(shared_counter == 5, "top-level binding visible");
        assert(bump_shared() == 6, "declared function registered");
        "#,
                         m = module.display()
    );
    assert_success(&script);
}

#[test]
fn filesystem_builtins() {
    let dir = fixture_dir("fs");
    fs::write(dir.join("a.txt"), "alpha").expect("write a");
    fs::write(dir.join("b.txt"), "beta").expect("write b");

    let script = format!(
                         r#"
        var names: any = readDir("{dir}");
        assert(includes(names, "a.txt") && includes(names, "b.txt"), "directory listing");

        write("{dir}/out.txt", "written " + 1);
        assert(read("{dir}/out.txt") == "written 1", "write then read");

        copy("{dir}/a.txt", "{dir}/a2.txt");
        assert(read("{dir}/a2.txt") == "alpha", "copy preserves contents");
        "#,
                         dir = dir.display()
    );
    assert_success(&script);

    assert_failure(&format!("read(\"{}/definitely-missing.txt\");", dir.display()));
}
