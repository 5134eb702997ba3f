//! End-to-end propagation scenarios on temporary project trees.

use crate::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

static TEST_COUNTER: AtomicU64 = AtomicU64::new(0);

fn write_file(file: &Path, content: &str) {
    fs::create_dir_all(file.parent().unwrap()).unwrap();
    fs::write(file, content).unwrap();
}

fn read(file: &Path) -> String {
    fs::read_to_string(file).unwrap()
}

fn setup_temp_project() -> PathBuf {
    let id = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let dir = std::env::temp_dir()
        .join("deprop_tests")
        .join(format!("{}_{}", timestamp, id));

    if dir.exists() {
        fs::remove_dir_all(&dir).ok();
    }
    fs::create_dir_all(dir.join("src")).unwrap();
    dir
}

const CALCULATOR: &str = "public class Calculator {
    public int add(int a,int b){ return a+b; }

    public int subtract(int a, int b) {
        return a - b;
    }
}
";

const ORDERS: &str = "public class Orders {
    public int total(int n) {
        int base = compute(n);
        return base + helper.getRate() + Math.max(n, 1);
    }

    public int other() {
        return 0;
    }
}
";

const PRICING: &str = "public class Pricing {
    public int compute(int n) {
        return n * 2;
    }

    public int getRate() {
        return 3;
    }
}
";

fn count_marks(text: &str) -> usize {
    text.lines().filter(|l| l.trim() == "@Deprecated").count()
}

// Core Test 1: single declaration, marker directly above
#[test]
fn test_add_scenario() {
    let root = setup_temp_project();
    let file = root.join("src/Calculator.java");
    write_file(&file, CALCULATOR);

    let result = Deprop::new(&root).with_target("add").run();

    assert!(result.success, "run failed: {:?}", result.error);
    assert_eq!(result.files_updated, 1);
    assert_eq!(result.methods_marked, 1);
    assert_eq!(result.types_promoted, 0);
    assert!(result.error.is_none());
    assert_eq!(
        read(&file),
        "public class Calculator {
    /** Do not change without asking MODS Team*/
    @Deprecated
    public int add(int a,int b){ return a+b; }

    public int subtract(int a, int b) {
        return a - b;
    }
}
"
    );
    assert!(result.details.contains("Starting deprecation process for method: add"));
    assert!(result.details.contains("Found 1 occurrence(s) in:"));
}

// Core Test 2: second identical run is a no-op
#[test]
fn test_add_scenario_is_idempotent() {
    let root = setup_temp_project();
    let file = root.join("src/Calculator.java");
    write_file(&file, CALCULATOR);

    let first = Deprop::new(&root).with_target("add").run();
    assert_eq!(first.methods_marked, 1);
    let after_first = read(&file);

    let second = Deprop::new(&root).with_target("add").run();
    assert!(second.success);
    assert_eq!(second.files_updated, 0);
    assert_eq!(second.methods_marked, 0);
    assert_eq!(second.types_promoted, 0);
    assert_eq!(read(&file), after_first);
}

// Core Test 3: promotion alone over pre-marked members
#[test]
fn test_promotion_only_run() {
    let root = setup_temp_project();
    let file = root.join("src/Legacy.java");
    write_file(
        &file,
        "public class Legacy {
    @Deprecated
    public void a() {
    }

    @Deprecated
    public void b() {
    }
}
",
    );

    let result = Deprop::new(&root).promote_classes();

    assert!(result.success);
    assert_eq!(result.types_promoted, 1);
    assert_eq!(result.methods_marked, 0);
    assert_eq!(result.files_updated, 1);
    let text = read(&file);
    assert!(text.starts_with(
        "/** Do not change without asking MODS Team*/\n@Deprecated\npublic class Legacy {\n"
    ));
    assert!(result.details.contains("Deprecating class: Legacy"));
}

#[test]
fn test_single_method_class_promoted_in_same_run() {
    let root = setup_temp_project();
    let file = root.join("src/Adder.java");
    write_file(
        &file,
        "public class Adder {\n    public int add(int a,int b){ return a+b; }\n}\n",
    );

    let result = Deprop::new(&root).with_target("add").run();
    assert_eq!(result.methods_marked, 1);
    assert_eq!(result.types_promoted, 1);
    assert_eq!(result.files_updated, 1);
    assert_eq!(count_marks(&read(&file)), 2);

    let again = Deprop::new(&root).with_target("add").run();
    assert_eq!(again.types_promoted, 0);
    assert_eq!(again.files_updated, 0);
}

// Overloads in one file: bottom-up insertion keeps every site intact
#[test]
fn test_overloads_marked_in_descending_order() {
    let root = setup_temp_project();
    let file = root.join("src/Calc.java");
    write_file(
        &file,
        "public class Calc {
    public int add(int a, int b) {
        return a + b;
    }

    public long add(long a, long b) {
        return a + b;
    }
}
",
    );

    let result = Deprop::new(&root).with_target("add").run();
    assert_eq!(result.methods_marked, 2);
    // Both members marked, so the class follows.
    assert_eq!(result.types_promoted, 1);

    let text = read(&file);
    let lines: Vec<&str> = text.lines().collect();
    for decl in ["public int add(int a, int b) {", "public long add(long a, long b) {"] {
        let idx = lines.iter().position(|l| l.trim() == decl).unwrap();
        assert_eq!(lines[idx - 1].trim(), "@Deprecated");
        assert_eq!(
            lines[idx - 2].trim(),
            "/** Do not change without asking MODS Team*/"
        );
    }
}

#[test]
fn test_signature_narrows_overloads() {
    let root = setup_temp_project();
    let file = root.join("src/Calc.java");
    write_file(
        &file,
        "public class Calc {
    public int add(int a, int b) {
        return a + b;
    }

    public long add(long a, long b) {
        return a + b;
    }
}
",
    );

    let result = Deprop::new(&root)
        .with_target("add")
        .with_signature(Some("long add(long a,long b)".to_string()))
        .run();

    assert_eq!(result.methods_marked, 1);
    assert_eq!(result.types_promoted, 0);
    assert!(result.details.contains("Method signature: long add(long a,long b)"));

    let text = read(&file);
    let lines: Vec<&str> = text.lines().collect();
    let int_add = lines
        .iter()
        .position(|l| l.trim() == "public int add(int a, int b) {")
        .unwrap();
    assert_ne!(lines[int_add - 1].trim(), "@Deprecated");
    let long_add = lines
        .iter()
        .position(|l| l.trim() == "public long add(long a, long b) {")
        .unwrap();
    assert_eq!(lines[long_add - 1].trim(), "@Deprecated");
}

// Cascade reaches callees in other files and skips accessors and built-ins
#[test]
fn test_cascade_across_files_skips_accessors() {
    let root = setup_temp_project();
    let orders = root.join("src/Orders.java");
    let pricing = root.join("src/Pricing.java");
    write_file(&orders, ORDERS);
    write_file(&pricing, PRICING);

    let result = Deprop::new(&root).with_target("total").run();

    assert!(result.success);
    assert_eq!(result.methods_marked, 2);
    assert_eq!(result.files_updated, 2);
    assert_eq!(result.types_promoted, 0);
    assert!(result.details.contains("Cascading from total to callee: compute"));
    assert!(!result.details.contains("callee: getRate"));
    assert!(!result.details.contains("callee: max"));

    let text = read(&pricing);
    let lines: Vec<&str> = text.lines().collect();
    let compute = lines
        .iter()
        .position(|l| l.trim() == "public int compute(int n) {")
        .unwrap();
    assert_eq!(lines[compute - 1].trim(), "@Deprecated");
    let get_rate = lines
        .iter()
        .position(|l| l.trim() == "public int getRate() {")
        .unwrap();
    assert_ne!(lines[get_rate - 1].trim(), "@Deprecated");

    // The call site inside `total` is not a declaration.
    assert_eq!(count_marks(&read(&orders)), 1);
}

#[test]
fn test_cascade_disabled() {
    let root = setup_temp_project();
    write_file(&root.join("src/Orders.java"), ORDERS);
    write_file(&root.join("src/Pricing.java"), PRICING);

    let result = Deprop::new(&root)
        .with_target("total")
        .with_cascade(false)
        .run();

    assert_eq!(result.methods_marked, 1);
    assert_eq!(result.files_updated, 1);
    assert_eq!(read(&root.join("src/Pricing.java")), PRICING);
}

// Call cycles terminate through the visited set
#[test]
fn test_cascade_cycle_terminates() {
    let root = setup_temp_project();
    let file = root.join("src/Loop.java");
    write_file(
        &file,
        "public class Loop {
    public void ping(int n) {
        pong(n - 1);
    }

    public void pong(int n) {
        ping(n - 1);
    }

    public void keep() {
    }
}
",
    );

    let result = Deprop::new(&root).with_target("ping").run();

    assert!(result.success);
    assert_eq!(result.methods_marked, 2);
    assert_eq!(result.types_promoted, 0);
    assert_eq!(count_marks(&read(&file)), 2);
}

#[test]
fn test_second_cascade_run_is_noop() {
    let root = setup_temp_project();
    write_file(&root.join("src/Orders.java"), ORDERS);
    write_file(&root.join("src/Pricing.java"), PRICING);

    let first = Deprop::new(&root).with_target("total").run();
    assert_eq!(first.methods_marked, 2);
    let orders = read(&root.join("src/Orders.java"));
    let pricing = read(&root.join("src/Pricing.java"));

    let second = Deprop::new(&root).with_target("total").run();
    assert_eq!(second.methods_marked, 0);
    assert_eq!(second.files_updated, 0);
    assert_eq!(read(&root.join("src/Orders.java")), orders);
    assert_eq!(read(&root.join("src/Pricing.java")), pricing);
}

// A marker above a long doc comment is still recognized
#[test]
fn test_doc_comment_block_idempotent() {
    let root = setup_temp_project();
    let file = root.join("src/Doc.java");
    write_file(
        &file,
        "public class Doc {
    /**
     * Adds numbers.
     *
     * @param a first
     * @param b second
     */
    public int add(int a, int b) {
        return a + b;
    }

    public int keep() {
        return 1;
    }
}
",
    );

    let first = Deprop::new(&root).with_target("add").run();
    assert_eq!(first.methods_marked, 1);
    let text = read(&file);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[1].trim(), "/** Do not change without asking MODS Team*/");
    assert_eq!(lines[2].trim(), "@Deprecated");
    assert_eq!(lines[3].trim(), "/**");

    let second = Deprop::new(&root).with_target("add").run();
    assert_eq!(second.methods_marked, 0);
    assert_eq!(read(&file), text);
}

#[test]
fn test_dry_run_writes_nothing() {
    let root = setup_temp_project();
    let file = root.join("src/Calculator.java");
    write_file(&file, CALCULATOR);

    let result = Deprop::new(&root).with_target("add").dry_run(true).run();

    assert!(result.success);
    assert_eq!(result.methods_marked, 1);
    assert_eq!(result.files_updated, 1);
    assert!(result.details.contains("Would update:"));
    assert_eq!(read(&file), CALCULATOR);
}

#[test]
fn test_no_match_is_empty_success() {
    let root = setup_temp_project();
    write_file(&root.join("src/Calculator.java"), CALCULATOR);

    let result = Deprop::new(&root).with_target("divide").run();
    assert!(result.success);
    assert_eq!(result.files_updated, 0);
    assert_eq!(result.methods_marked, 0);
    assert_eq!(read(&root.join("src/Calculator.java")), CALCULATOR);
}

#[test]
fn test_missing_root_fails() {
    let root = setup_temp_project().join("missing");
    let result = Deprop::new(&root).with_target("add").run();
    assert!(!result.success);
    assert!(result.error.is_some());
    assert_eq!(result.files_updated, 0);
}

#[test]
fn test_empty_method_name_fails() {
    let root = setup_temp_project();
    write_file(&root.join("src/Calculator.java"), CALCULATOR);

    let result = Deprop::new(&root).with_target("").run();
    assert!(!result.success);
    assert!(result.error.unwrap().contains("method name"));
    assert_eq!(read(&root.join("src/Calculator.java")), CALCULATOR);
}

#[test]
fn test_build_dirs_are_skipped() {
    let root = setup_temp_project();
    write_file(&root.join("src/Calculator.java"), CALCULATOR);
    write_file(&root.join("target/gen/Calculator.java"), CALCULATOR);
    write_file(&root.join("build/Calculator.java"), CALCULATOR);

    let result = Deprop::new(&root).with_target("add").run();
    assert_eq!(result.files_updated, 1);
    assert_eq!(read(&root.join("target/gen/Calculator.java")), CALCULATOR);
    assert_eq!(read(&root.join("build/Calculator.java")), CALCULATOR);
}

#[test]
fn test_config_file_applies() {
    let root = setup_temp_project();
    write_file(
        &root.join(CONFIG_FILE),
        "[marker]\ncomment = \"// scheduled for removal\"\n\n[cascade]\nenabled = false\n",
    );
    write_file(&root.join("src/Orders.java"), ORDERS);
    write_file(&root.join("src/Pricing.java"), PRICING);

    let result = Deprop::new(&root).with_target("total").run();

    assert_eq!(result.methods_marked, 1);
    assert!(read(&root.join("src/Orders.java")).contains(
        "    // scheduled for removal\n    @Deprecated\n    public int total(int n) {"
    ));
    assert_eq!(read(&root.join("src/Pricing.java")), PRICING);
}

#[test]
fn test_invalid_config_fails_before_touching_files() {
    let root = setup_temp_project();
    write_file(&root.join(CONFIG_FILE), "bogus = 1\n");
    write_file(&root.join("src/Calculator.java"), CALCULATOR);

    let result = Deprop::new(&root).with_target("add").run();
    assert!(!result.success);
    assert!(result.error.unwrap().contains("Config error"));
    assert_eq!(read(&root.join("src/Calculator.java")), CALCULATOR);
}

// Braces inside literals only matter in textual mode
#[test]
fn test_lexed_scope_mode_sees_whole_body() {
    let source = "public class Text {
    public String render() {
        String close = \"}\";
        return wrap(close);
    }

    public String wrap(String s) {
        return \"[\" + s + \"]\";
    }
}
";
    let textual = setup_temp_project();
    write_file(&textual.join("src/Text.java"), source);
    let result = Deprop::new(&textual).with_target("render").run();
    // The literal brace ends the body before the call to `wrap`.
    assert_eq!(result.methods_marked, 1);

    let lexed = setup_temp_project();
    write_file(&lexed.join("src/Text.java"), source);
    let result = Deprop::new(&lexed)
        .with_target("render")
        .with_scope_mode(ScopeMode::Lexed)
        .run();
    assert_eq!(result.methods_marked, 2);
    assert!(result.details.contains("callee: wrap"));
}

// Inline annotations with arguments do not hide a declaration
#[test]
fn test_inline_annotated_declaration_is_marked() {
    let root = setup_temp_project();
    let file = root.join("src/Calc.java");
    write_file(
        &file,
        "public class Calc {
    @SuppressWarnings(\"unchecked\") public int add(int a, int b) {
        return a + b;
    }

    public int keep() {
        return 0;
    }
}
",
    );

    let result = Deprop::new(&root).with_target("add").run();

    assert!(result.success);
    assert_eq!(result.methods_marked, 1);
    assert_eq!(result.types_promoted, 0);
    let text = read(&file);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[1], "    /** Do not change without asking MODS Team*/");
    assert_eq!(lines[2], "    @Deprecated");
    assert_eq!(
        lines[3],
        "    @SuppressWarnings(\"unchecked\") public int add(int a, int b) {"
    );

    let again = Deprop::new(&root).with_target("add").run();
    assert_eq!(again.methods_marked, 0);
    assert_eq!(read(&file), text);
}

// `new pkg.Type(...)` builds an object; the constructor is not a callee
#[test]
fn test_qualified_constructor_is_not_cascaded() {
    let root = setup_temp_project();
    let foo = root.join("src/com/x/Foo.java");
    let foo_source = "public class Foo {
    public Foo() {
    }

    public void other() {
    }
}
";
    write_file(&foo, foo_source);
    write_file(
        &root.join("src/Factory.java"),
        "public class Factory {
    public Object run() {
        Object o = new com.x.Foo();
        return build(o);
    }

    public Object build(Object o) {
        return o;
    }

    public void keep() {
    }
}
",
    );

    let result = Deprop::new(&root).with_target("run").run();

    assert!(result.success);
    assert_eq!(result.methods_marked, 2);
    assert!(result.details.contains("Cascading from run to callee: build"));
    assert!(!result.details.contains("callee: Foo"));
    assert_eq!(read(&foo), foo_source);
}

// An unreadable file fails the run without stopping the others
#[test]
fn test_unreadable_file_is_skipped_and_reported() {
    let root = setup_temp_project();
    let calculator = root.join("src/Calculator.java");
    write_file(&calculator, CALCULATOR);
    fs::write(root.join("src/Bad.java"), [0xff, 0xfe, b'x']).unwrap();

    let result = Deprop::new(&root).with_target("add").run();

    assert!(!result.success);
    assert_eq!(result.methods_marked, 1);
    assert_eq!(result.files_updated, 1);
    assert!(result.error.unwrap().contains("Bad.java"));
    assert!(result.details.contains("completed with 1 error(s)"));
    assert!(read(&calculator).contains("    @Deprecated\n    public int add(int a,int b)"));
    assert_eq!(fs::read(root.join("src/Bad.java")).unwrap(), [0xff, 0xfe, b'x']);
}

const LEDGER: &str = "public class Ledger {
    public void finish(int n) {
        settle(n);
    }

    public void settle(int n) {
    }

    public void keep() {
    }
}
";

// `settle` is not an accessor unless the prefix rule is configured
#[test]
fn test_accessor_rule_decides_prefix_names() {
    let capitalized = setup_temp_project();
    write_file(&capitalized.join("src/Ledger.java"), LEDGER);
    let result = Deprop::new(&capitalized).with_target("finish").run();
    assert_eq!(result.methods_marked, 2);
    assert!(result.details.contains("callee: settle"));

    let prefix = setup_temp_project();
    write_file(&prefix.join(CONFIG_FILE), "[cascade]\naccessor_rule = \"prefix\"\n");
    write_file(&prefix.join("src/Ledger.java"), LEDGER);
    let result = Deprop::new(&prefix).with_target("finish").run();
    assert_eq!(result.methods_marked, 1);
    assert!(!result.details.contains("callee: settle"));
}

#[test]
fn test_custom_heuristics_are_used() {
    struct NoMatches;

    impl SourceHeuristics for NoMatches {
        fn find_declarations(&self, _: &[String], _: &Target, _: &Marker) -> Vec<usize> {
            Vec::new()
        }
        fn find_type_declarations(&self, _: &[String]) -> Vec<(usize, String)> {
            Vec::new()
        }
        fn find_members(&self, _: &[String], _: usize, _: usize) -> Vec<(usize, String)> {
            Vec::new()
        }
        fn find_call_sites(&self, _: &str) -> Vec<String> {
            Vec::new()
        }
        fn find_scope_end(&self, _: &[String], start: usize) -> usize {
            start
        }
    }

    let root = setup_temp_project();
    write_file(&root.join("src/Calculator.java"), CALCULATOR);

    let result = Deprop::new(&root)
        .with_target("add")
        .with_heuristics(Box::new(NoMatches))
        .run();
    assert!(result.success);
    assert_eq!(result.methods_marked, 0);
    assert_eq!(read(&root.join("src/Calculator.java")), CALCULATOR);
}

#[test]
fn test_logging_does_not_panic() {
    init_logging(LogFormat::Json);
    init_logging(LogFormat::Pretty);
}
