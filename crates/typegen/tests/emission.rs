// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com
//
// End-to-end emission: registry -> pipeline -> sink.

#![allow(clippy::missing_panics_doc)]

use pretty_assertions::assert_eq;
use std::fs;

use typegen::{
    emit_all, ArtifactKind, BodyGenerator, EmitError, EmitPolicy, Emitter, FileSink, MemorySink,
    Registry, RegistryBuilder, TypeBuilder,
};

fn pair_registry() -> Registry {
    let mut reg = RegistryBuilder::new();
    reg.register(TypeBuilder::primitive("Int")).unwrap();
    reg.register(TypeBuilder::collection("ListOfInt", "vector").element("Int"))
        .unwrap();
    reg.register(
        TypeBuilder::structure("Pair")
            .member("a", "Int")
            .member("b", "ListOfInt"),
    )
    .unwrap();
    reg.freeze().unwrap()
}

#[test]
fn test_pair_type_header() {
    let registry = pair_registry();
    let sink = MemorySink::new();
    emit_all(&registry, &sink, EmitPolicy::FailFast).unwrap();

    assert_eq!(
        sink.file("Pair_decl.h").unwrap(),
        "struct Pair;\n\
         #include \"ListOfInt_decl.h\"\n\
         struct Pair {\n\
         \x20 Pair();\n\
         \x20 Pair(Int _a, ListOfInt const &_b);\n\
         \x20 Int a;\n\
         \x20 ListOfInt b;\n\
         };\n"
    );
}

#[test]
fn test_pair_host_code() {
    let registry = pair_registry();
    let sink = MemorySink::new();
    emit_all(&registry, &sink, EmitPolicy::FailFast).unwrap();

    assert_eq!(
        sink.file("Pair_host.cc").unwrap(),
        "#include \"common/std_headers.h\"\n\
         #include \"Pair_decl.h\"\n\
         \n\
         Pair::Pair()\n\
         {\n\
         }\n"
    );
}

#[test]
fn test_pair_wrapper_artifacts() {
    let registry = pair_registry();
    let sink = MemorySink::new();
    emit_all(&registry, &sink, EmitPolicy::FailFast).unwrap();

    let header = sink.file("Pair_jsWrap.h").unwrap();
    let lines: Vec<&str> = header.lines().collect();
    assert_eq!(lines[0], "#include \"ListOfInt_decl.h\"");
    assert_eq!(lines[1], "#include \"Pair_decl.h\"");
    assert!(header.contains("struct JsWrap_Pair;"));

    let code = sink.file("Pair_jsWrap.cc").unwrap();
    assert!(code.contains("/* declDependencies = Int,ListOfInt */"));
    assert!(code.contains("#include \"ListOfInt_jsWrap.h\""));
    assert!(!code.contains("#include \"Int_jsWrap.h\""));
    assert!(code.contains("convCToJs(isolate, thisObj->it->a)"));
    assert!(code.contains("JsWrap_ListOfInt::MemberInstance(isolate, args.This(), thisObj->it->b)"));
    assert!(code.contains("void jsInit_Pair(v8::Local<v8::Object> exports) {"));

    let adaptor = sink.file("Pair_ros.h").unwrap();
    assert!(adaptor.contains("template<> struct Serializer<Pair> {"));

    let stub = sink.file("test_Pair.js").unwrap();
    assert!(stub.contains("describe('Pair', function() {"));
    assert!(stub.contains("assert.ok('b' in t);"));
}

#[test]
fn test_report_lists_artifacts_in_resolved_order() {
    let registry = pair_registry();
    let sink = MemorySink::new();
    let report = emit_all(&registry, &sink, EmitPolicy::FailFast).unwrap();

    assert!(report.is_success());
    let names: Vec<&str> = report.emitted.iter().map(|t| t.type_name.as_str()).collect();
    assert_eq!(names, vec!["ListOfInt", "Pair"]);
    assert_eq!(report.artifact_count(), 12);
    assert_eq!(
        report.emitted[1].artifacts,
        vec![
            "Pair_host.cc",
            "Pair_decl.h",
            "Pair_jsWrap.h",
            "Pair_jsWrap.cc",
            "Pair_ros.h",
            "test_Pair.js",
        ]
    );
    let key = &report.emitted[1].version_key;
    assert!(key.starts_with("Pair@"));
    assert_eq!(key.len(), "Pair@".len() + 8);
    assert!(sink.file("Int_decl.h").is_none());
}

#[test]
fn test_wrapper_only_requests() {
    let mut reg = RegistryBuilder::new();
    reg.register(TypeBuilder::object("Handle").wrapper_only())
        .unwrap();
    let registry = reg.freeze().unwrap();
    let sink = MemorySink::new();
    emit_all(&registry, &sink, EmitPolicy::FailFast).unwrap();

    let kinds: Vec<ArtifactKind> = sink.requests().into_iter().map(|(k, _)| k).collect();
    assert_eq!(
        kinds,
        vec![
            ArtifactKind::WrapperHeader,
            ArtifactKind::WrapperCode,
            ArtifactKind::MiddlewareAdaptor,
            ArtifactKind::TestStub,
        ]
    );
    assert!(sink.file("Handle_host.cc").is_none());
    assert!(sink.file("Handle_decl.h").is_none());
    assert!(!sink.file("Handle_jsWrap.h").unwrap().contains("Handle_decl.h"));
}

#[test]
fn test_missing_sink_continue() {
    let registry = pair_registry();
    let sink = MemorySink::new().refusing(ArtifactKind::TestStub);
    let report = emit_all(&registry, &sink, EmitPolicy::Continue).unwrap();

    assert!(report.emitted.is_empty());
    assert_eq!(report.failures.len(), 2);
    assert_eq!(report.failures[0].0, "ListOfInt");
    assert!(matches!(
        report.failures[1].1,
        EmitError::MissingSink {
            kind: ArtifactKind::TestStub,
            ..
        }
    ));
    assert!(sink.file_names().is_empty());
}

#[test]
fn test_missing_sink_fail_fast() {
    let registry = pair_registry();
    let sink = MemorySink::new().refusing(ArtifactKind::WrapperCode);
    let err = emit_all(&registry, &sink, EmitPolicy::FailFast).unwrap_err();
    assert!(matches!(err, EmitError::MissingSink { .. }));

    // First planning type stops the run after its fourth request.
    let requests = sink.requests();
    assert_eq!(requests.len(), 4);
    assert!(requests.iter().all(|(_, name)| name == "ListOfInt"));
}

#[test]
fn test_unsupported_conversion_aborts_only_that_type() {
    let mut reg = RegistryBuilder::new();
    reg.register(TypeBuilder::primitive("double")).unwrap();
    reg.register(TypeBuilder::object("Blob").wrapper_only()).unwrap();
    reg.register(TypeBuilder::structure("Bad").member("blob", "Blob"))
        .unwrap();
    reg.register(TypeBuilder::structure("Good").member("x", "double"))
        .unwrap();
    let registry = reg.freeze().unwrap();

    let sink = MemorySink::new();
    let report = emit_all(&registry, &sink, EmitPolicy::Continue).unwrap();

    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].0, "Bad");
    assert!(matches!(
        &report.failures[0].1,
        EmitError::UnsupportedConversion { type_name } if type_name == "Blob"
    ));
    assert!(sink.file_names().iter().all(|n| !n.contains("Bad")));
    assert!(sink.file("Good_jsWrap.cc").is_some());
    assert!(sink.file("Blob_jsWrap.h").is_some());
    assert!(!sink.file("Blob_jsWrap.h").unwrap().contains("jsToJs_Blob"));
}

#[test]
fn test_object_member_converts_through_wrapper() {
    let mut reg = RegistryBuilder::new();
    reg.register(TypeBuilder::object("Blob")).unwrap();
    reg.register(TypeBuilder::structure("Holder").member("blob", "Blob"))
        .unwrap();
    let registry = reg.freeze().unwrap();

    let sink = MemorySink::new();
    let report = emit_all(&registry, &sink, EmitPolicy::FailFast).unwrap();
    assert!(report.is_success());

    let code = sink.file("Holder_jsWrap.cc").unwrap();
    assert!(code.contains("JsWrap_Blob::MemberInstance(isolate, args.This(), thisObj->it->blob)"));
    let header = sink.file("Blob_jsWrap.h").unwrap();
    assert!(header.contains("jsToJs_Blob(v8::Isolate *isolate, Blob const &it);"));
}

#[test]
fn test_pointer_member_converts_through_pointee() {
    let mut reg = RegistryBuilder::new();
    reg.register(TypeBuilder::primitive("double")).unwrap();
    reg.register(TypeBuilder::structure("Node").member("v", "double").member("next", "Node*"))
        .unwrap();
    reg.register(TypeBuilder::pointer("Node*", "Node")).unwrap();
    let registry = reg.freeze().unwrap();

    let sink = MemorySink::new();
    emit_all(&registry, &sink, EmitPolicy::FailFast).unwrap();

    let code = sink.file("Node_jsWrap.cc").unwrap();
    assert!(code.contains("JsWrap_Node::MemberInstance(isolate, args.This(), (*thisObj->it->next))"));
    assert!(sink.requests().iter().all(|(_, name)| name != "Node*"));
}

#[test]
fn test_include_ordering() {
    let mut reg = RegistryBuilder::new();
    reg.register(TypeBuilder::structure("Dep")).unwrap();
    reg.register(TypeBuilder::structure("Impl")).unwrap();
    reg.register(TypeBuilder::structure("Widget")).unwrap();
    {
        let widget = reg.customize("Widget").unwrap();
        widget
            .add_header_include("<cmath>")
            .add_header_include("local.h")
            .add_function_decl("void frob(Widget &w);")
            .add_host_code("void frob(Widget &w) {}");
        widget.add_decl_dependency("Dep").unwrap();
        widget.add_defn_dependency("Impl").unwrap();
    }
    let registry = reg.freeze().unwrap();

    let sink = MemorySink::new();
    emit_all(&registry, &sink, EmitPolicy::FailFast).unwrap();

    let header = sink.file("Widget_decl.h").unwrap();
    let lines: Vec<&str> = header.lines().collect();
    assert_eq!(
        &lines[..4],
        &[
            "struct Widget;",
            "#include \"Dep_decl.h\"",
            "#include <cmath>",
            "#include \"local.h\"",
        ]
    );
    assert_eq!(lines.last(), Some(&"void frob(Widget &w);"));

    let host = sink.file("Widget_host.cc").unwrap();
    let lines: Vec<&str> = host.lines().collect();
    assert_eq!(
        &lines[..3],
        &[
            "#include \"common/std_headers.h\"",
            "#include \"Widget_decl.h\"",
            "#include \"Impl_decl.h\"",
        ]
    );
    assert_eq!(lines.last(), Some(&"void frob(Widget &w) {}"));
}

#[test]
fn test_template_collection_names() {
    let mut reg = RegistryBuilder::new();
    reg.register(TypeBuilder::primitive("string")).unwrap();
    reg.register(TypeBuilder::primitive("jsonstr")).unwrap();
    reg.register(
        TypeBuilder::collection("map<string,jsonstr>", "map")
            .element("string")
            .element("jsonstr"),
    )
    .unwrap();
    let registry = reg.freeze().unwrap();

    let sink = MemorySink::new();
    emit_all(&registry, &sink, EmitPolicy::FailFast).unwrap();

    assert!(sink.file("map_string_jsonstr_decl.h").is_some());
    let wrap = sink.file("map_string_jsonstr_jsWrap.h").unwrap();
    assert!(wrap.contains("struct JsWrap_map_string_jsonstr;"));
    assert!(wrap.contains("jsToJs_map_string_jsonstr(v8::Isolate *isolate, map<string,jsonstr> const &it)"));
}

struct Silent;

impl BodyGenerator for Silent {}

#[test]
fn test_custom_body_generator() {
    let registry = pair_registry();
    let sink = MemorySink::new();
    Emitter::new(&registry, &sink)
        .with_bodies(&Silent)
        .emit_all(EmitPolicy::FailFast)
        .unwrap();

    assert_eq!(
        sink.file("Pair_decl.h").unwrap(),
        "#include \"ListOfInt_decl.h\"\n"
    );
    assert_eq!(sink.file("test_Pair.js").unwrap(), "");
}

#[test]
fn test_parallel_matches_sequential() {
    let registry = pair_registry();
    let seq = MemorySink::new();
    let par = MemorySink::new();
    let a = Emitter::new(&registry, &seq).emit_all(EmitPolicy::FailFast).unwrap();
    let b = Emitter::new(&registry, &par)
        .emit_all_parallel(EmitPolicy::FailFast)
        .unwrap();

    assert_eq!(a.emitted, b.emitted);
    assert_eq!(seq.file_names(), par.file_names());
    for name in seq.file_names() {
        assert_eq!(seq.file(&name), par.file(&name));
    }
}

#[test]
fn test_file_sink_writes_every_planned_file() {
    let dir = tempfile::tempdir().unwrap();
    let registry = pair_registry();
    let sink = FileSink::new(dir.path());
    let report = emit_all(&registry, &sink, EmitPolicy::FailFast).unwrap();

    let mut written: Vec<String> = fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    written.sort();

    let mut expected: Vec<String> = report
        .emitted
        .iter()
        .flat_map(|t| t.artifacts.iter().cloned())
        .collect();
    expected.sort();
    assert_eq!(written, expected);
}

#[test]
fn test_file_sink_missing_root() {
    let dir = tempfile::tempdir().unwrap();
    let registry = pair_registry();
    let sink = FileSink::new(dir.path().join("nope"));
    let err = emit_all(&registry, &sink, EmitPolicy::FailFast).unwrap_err();
    assert!(matches!(
        err,
        EmitError::MissingSink {
            kind: ArtifactKind::HostCode,
            ..
        }
    ));
}
