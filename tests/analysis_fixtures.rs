use std::path::{Path, PathBuf};

use goreflect::{Package, ParseOptions, Parser, Results, Shape};
use regex::Regex;

fn testdata(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/testdata")
        .join(name)
}

fn analyze(opts: ParseOptions) -> Results {
    match Parser::new().parse_directory(&opts) {
        Ok(r) => r,
        Err(e) => panic!("analysis of {} failed: {e}", opts.path.display()),
    }
}

fn single_package(name: &str) -> Package {
    let mut r = analyze(ParseOptions::new(testdata(name)));
    assert!(r.diagnostics.is_empty(), "{:#?}", r.diagnostics);
    assert_eq!(r.packages.len(), 1);
    r.packages.remove(name).expect("package named after its directory")
}

#[test]
fn simple_struct_fields_markers_and_tags() {
    let p = single_package("simple");
    assert!(p.interfaces.is_empty() && p.functions.is_empty() && p.vars.is_empty());

    let user = &p.structs["User"];
    assert_eq!(user.markers["+Foo"], "true");
    assert_eq!(user.markers["+Bar"], "123");
    assert_eq!(
        user.fields.keys().collect::<Vec<_>>(),
        ["Age", "DisplayName", "Email", "ID"]
    );
    assert!(user.methods.is_empty());
    assert!(user.embedded_fields.is_empty());

    let id = &user.fields["ID"];
    assert_eq!(id.markers["+something:id"], "true");
    assert_eq!(id.tags["json"], ["id"]);
    assert_eq!(id.typ.type_name, "string");
    assert!(id.typ.is_named());

    let display = &user.fields["DisplayName"];
    assert!(display.markers.is_empty());
    assert!(display.typ.is_pointer());
    assert_eq!(display.typ.type_name, "*string");
    let Shape::Pointer { elem } = &display.typ.shape else {
        panic!("expected pointer shape");
    };
    assert_eq!(elem.external_type_name, "string");

    assert_eq!(user.fields["Age"].typ.type_name, "int");
}

#[test]
fn interface_methods_with_func_parameters() {
    let p = single_package("interfaces");
    assert_eq!(p.structs.len(), 1);
    assert!(p.interfaces["TestInterface"].methods.is_empty());

    let iface = &p.interfaces["MyInterface"];
    assert_eq!(iface.markers["+Foo"], "true");
    assert!(iface.embedded_types.is_empty());

    let m = &iface.methods["DoSomething"];
    assert_eq!(m.markers["+Bar"], "123");
    assert!(!m.has_receiver);
    assert!(!m.def.is_variadic);

    let names: Vec<_> = m.def.params.iter().map(|p| p.name.as_deref()).collect();
    assert_eq!(names, [Some("input"), Some("f")]);
    assert_eq!(m.def.params[0].typ.type_name, "*string");

    let f = &m.def.params[1].typ;
    assert!(f.is_func());
    assert_eq!(f.type_name, "func([]TestInterface) map[string]TestStruct");
    assert_eq!(
        f.external_type_name,
        "func([]interfaces.TestInterface) map[string]interfaces.TestStruct"
    );
    let def = f.func().unwrap();
    assert_eq!(def.params[0].name, None);
    let Shape::Slice { elem } = &def.params[0].typ.shape else {
        panic!("expected slice shape");
    };
    assert!(elem.is_interface());
    let Shape::Map { key, value } = &def.results[0].typ.shape else {
        panic!("expected map shape");
    };
    assert_eq!(key.type_name, "string");
    assert!(value.is_struct());
    assert_eq!(value.external_type_name, "interfaces.TestStruct");

    let results: Vec<_> = m
        .def
        .results
        .iter()
        .map(|r| (r.name.as_deref(), r.typ.type_name.as_str()))
        .collect();
    assert_eq!(results, [(Some("output"), "string"), (Some("err"), "error")]);
}

#[test]
fn globals_constants_and_vars() {
    let p = single_package("globals");

    let c = &p.constants["myConstant"];
    assert_eq!(c.type_name, "string");
    assert_eq!(c.value, "\"test\"");
    assert_eq!(c.markers["+Foo"], "true");

    let typed = &p.constants["myStringType"];
    assert_eq!(typed.type_name, "MyString");
    assert_eq!(typed.value, "\"test\"");
    assert!(typed.markers.is_empty());

    assert_eq!(p.defined_types["MyString"].typ.type_name, "string");

    let f = &p.vars["myFunc"];
    assert_eq!(f.markers["+Bar"], "123");
    assert!(f.typ.is_func());
    assert_eq!(f.typ.type_name, "func(string) error");
    let def = f.typ.func().unwrap();
    assert_eq!(def.params[0].name.as_deref(), Some("arg"));
    assert_eq!(def.results[0].typ.type_name, "error");

    let list = &p.vars["myFunc2"];
    assert!(list.typ.is_slice());
    assert_eq!(list.typ.type_name, "[]func(string) error");
    assert!(list.markers.is_empty());
}

#[test]
fn embedded_struct_members_and_interfaces() {
    let p = single_package("embedded");

    let child = &p.structs["Child"];
    assert!(child.fields.is_empty());
    assert_eq!(
        child.embedded_fields.keys().collect::<Vec<_>>(),
        ["Parent", "ParentInterface"]
    );
    for member in child.embedded_fields.values() {
        assert_eq!(member.type_name, member.name);
        assert_eq!(member.tags["yaml"], ["", "inline"]);
        assert_eq!(member.markers["+Foo"], "true");
        assert_eq!(member.markers["+Bar"], "123");
    }

    let ci = &p.interfaces["ChildInterface"];
    assert!(ci.methods.is_empty());
    assert_eq!(ci.embedded_types.len(), 2);
    assert_eq!(ci.embedded_types["Parent"].type_name, "Parent");
    assert_eq!(ci.embedded_types["ParentInterface"].markers["+Foo"], "true");

    let ps = &p.defined_types["ParentStruct"];
    assert!(ps.typ.is_func());
    assert_eq!(ps.typ.type_name, "func()");
    let def = ps.typ.func().unwrap();
    assert!(def.params.is_empty() && def.results.is_empty());
}

#[test]
fn functions_methods_and_variadics() {
    let p = single_package("functions");

    assert_eq!(p.vars.len(), 2);
    assert!(p.vars["myFunc"].typ.is_func());
    assert_eq!(p.vars["myGroupedFunc"].markers["+Foo"], "true");

    assert_eq!(p.functions.len(), 7);
    let free: Vec<_> = p.free_functions().map(|f| f.name.as_str()).collect();
    assert_eq!(free, ["Test1", "Test2", "Test3", "Test4", "Variadic"]);

    assert_eq!(p.functions["Test1"].markers["+Foo"], "true");
    assert_eq!(p.functions["Test2"].def.results[0].typ.type_name, "error");
    assert_eq!(p.functions["Test3"].def.params[0].name.as_deref(), Some("arg"));

    let t5 = &p.functions["Test5"];
    assert!(t5.has_receiver);
    assert_eq!(t5.receiver_name, "Field");
    assert_eq!(p.structs["Field"].methods.keys().collect::<Vec<_>>(), ["Test5"]);
    assert_eq!(p.structs["Reference"].methods.keys().collect::<Vec<_>>(), ["Test6"]);
    assert_eq!(p.functions["Test6"].receiver_name, "Reference");

    let v = &p.functions["Variadic"];
    assert!(v.def.is_variadic);
    let arg = &v.def.params[0].typ;
    assert!(arg.is_ellipsis());
    assert_eq!(arg.type_name, "...Field");
    assert_eq!(arg.external_type_name, "...functions.Field");
}

#[test]
fn typing_named_types_resolve_through_declarations() {
    let p = single_package("typing");

    let st = &p.structs["AStruct"];
    assert_eq!(st.fields["Field1"].typ.type_name, "StringType");
    assert_eq!(st.fields["Field2"].typ.external_type_name, "typing.IntType");

    let at = &p.defined_types["AStructType"].typ;
    assert!(at.is_struct());
    assert_eq!(at.type_name, "AStruct");
    assert_eq!(at.external_type_name, "typing.AStruct");

    let slice = &p.defined_types["SliceType"].typ;
    assert_eq!(slice.type_name, "[]AStruct");
    assert_eq!(slice.external_type_name, "[]typing.AStruct");

    assert_eq!(p.defined_types["StringType"].typ.type_name, "string");
    assert_eq!(p.defined_types["OfAType"].typ.type_name, "IntType");
    assert_eq!(p.aliases["AliasStringType"].typ.type_name, "string");
    assert_eq!(p.aliases["AliasStringType"].markers["+Bar"], "123");
    assert!(!p.defined_types.contains_key("AliasStringType"));
}

#[test]
fn permutation_packages_with_skipped_file() {
    let opts = ParseOptions::new(testdata("permutation"))
        .skip_files_with_contents(Regex::new("Skipped file in permutation test").unwrap());
    let r = analyze(opts);
    assert!(r.diagnostics.is_empty(), "{:#?}", r.diagnostics);
    assert_eq!(r.packages.keys().collect::<Vec<_>>(), ["package1", "package2"]);

    let user = &r.packages["package1"].structs["AnotherUser"];
    assert_eq!(user.fields["ID"].markers["+ID"], "true");
    assert_eq!(user.fields["DisplayName"].tags["json"], ["display_name"]);

    let time = &user.fields["Time"].typ;
    assert_eq!(time.type_name, "time.Time");
    let imported = time.imported.as_ref().unwrap();
    assert_eq!(imported.package_path, "time");
    assert_eq!(imported.package_default_alias, "time");
    assert_eq!(user.fields["Duration"].typ.type_name, "time.Duration");

    let ts = user.fields["Timestamp"].typ.imported.as_ref().unwrap();
    assert_eq!(ts.type_name, "Timestamp");
    assert_eq!(ts.local_alias.as_deref(), Some("tsproto"));
    assert_eq!(ts.package_default_alias, "timestamppb");
    assert_eq!(ts.import_raw, "\"google.golang.org/protobuf/types/known/timestamppb\"");

    let some = &r.packages["package2"].structs["SomeStruct"];
    assert_eq!(some.fields.len(), 9);
    assert_eq!(some.fields["ChanField"].typ.type_name, "chan int");
    assert!(some.fields["ChanField"].typ.is_chan());
    assert!(some.fields["SubStructField"].typ.is_struct());
    assert_eq!(
        some.fields["SubStructMapField"].typ.external_type_name,
        "map[string]package2.SubStruct"
    );
    assert_eq!(some.fields["SliceField"].tags["yaml"], ["sliceField"]);
}

#[test]
fn unskipped_duplicate_is_reported_and_last_wins() {
    let r = analyze(ParseOptions::new(testdata("permutation")));
    let some = &r.packages["package2"].structs["SomeStruct"];
    assert_eq!(some.fields.keys().collect::<Vec<_>>(), ["Replaced"]);

    assert_eq!(r.diagnostics.len(), 1);
    let d = &r.diagnostics[0];
    assert!(d.path.ends_with("skipped.go"), "{d}");
    assert!(d.message.contains("duplicate struct `SomeStruct`"), "{d}");
}
