mod common;

use common::{arg, config, document, init_tracing, input, input_ref, scalar};
use pngc::emitter::SourceEmitter;
use pngc::{generate, generate_with, Generator, InMemoryEmitter, RawConfig};
use pretty_assertions::assert_eq;
use std::cell::Cell;
use std::rc::Rc;

fn run(entries: &[(&str, &str)]) -> (InMemoryEmitter, pngc::GenerationReport) {
    init_tracing();
    let config = config(entries);
    let mut emitter = InMemoryEmitter::new();
    let report = generate_with(&document(), &config, &mut emitter).unwrap();
    (emitter, report)
}

fn class_file<'e>(emitter: &'e InMemoryEmitter, class: &str) -> Option<&'e pngc::emitter::SourceFile> {
    emitter
        .files()
        .find(|f| f.class().map(|c| c.name == class).unwrap_or(false))
}

#[test]
fn test_default_run_writes_every_block() {
    let (emitter, report) = run(&[]);

    for path in [
        "user/user.model.ts",
        "post/post.model.ts",
        "user/user-count.output.ts",
        "user/user-create.input.ts",
        "prisma/role.enum.ts",
        "prisma/sort-order.enum.ts",
        "decimal-helpers.ts",
    ] {
        assert!(report.files.contains(&path.to_string()), "missing {path}");
    }
    assert!(!report.files.iter().any(|f| f.ends_with("type-registry.ts")));
    assert_eq!(report.circular_pairs, vec!["Post:User".to_string()]);
    assert_eq!(emitter.save_count(), 1);

    let user = emitter.text("user/user.model.ts").unwrap();
    assert!(user.contains("@Field(() => ID, {nullable:false})\n    id!: number;"));
    assert!(user.contains("role!: `${Role}`;"));
    assert!(user.contains("import { Role } from '../prisma/role.enum';"));
    assert!(user.contains("@Field(() => [Post], {nullable:false})\n    posts!: Array<Post>;"));

    let args = class_file(&emitter, "FindUniqueUserArgs").unwrap().text();
    assert!(args.contains("where!: Prisma.AtLeast<UserWhereUniqueInput, 'id'>;"));
}

#[test]
fn test_hidden_field_only_in_output_context() {
    let (emitter, _) = run(&[]);

    let model = emitter.text("user/user.model.ts").unwrap();
    assert!(model.contains("@HideField()\n    secret!: string;"));
    assert!(!model.contains("@Field(() => String, {nullable:false})\n    secret"));

    let create = emitter.text("user/user-create.input.ts").unwrap();
    assert!(create.contains("@Field(() => String, {nullable:false})\n    secret!: string;"));
    assert!(!create.contains("HideField"));
}

#[test]
fn test_nullable_filter_promotion() {
    init_tracing();
    let mut document = document();
    let inputs = &mut document.schema.input_object_types.prisma;
    inputs.push(input("UserNullableFilter", vec![arg("is", false, vec![input_ref("UserWhereInput")])]));
    if let Some(post_where) = inputs.iter_mut().find(|i| i.name == "PostWhereInput") {
        post_where.fields[1].input_types = vec![input_ref("UserNullableFilter"), input_ref("UserWhereInput")];
    }

    let config = config(&[("combineScalarFilters", "true")]);
    let mut emitter = InMemoryEmitter::new();
    generate_with(&document, &config, &mut emitter).unwrap();

    assert!(class_file(&emitter, "UserFilter").is_some());
    assert!(class_file(&emitter, "UserNullableFilter").is_none());
    assert!(class_file(&emitter, "StringNullableFilter").is_none());
    assert!(class_file(&emitter, "NestedStringNullableFilter").is_none());

    let post_where = class_file(&emitter, "PostWhereInput").unwrap().text();
    assert!(post_where.contains("author?: UserFilter;"));
    let user_where = class_file(&emitter, "UserWhereInput").unwrap().text();
    assert!(user_where.contains("name?: StringFilter;"));
}

#[test]
fn test_before_input_type_removal_is_visible_later() {
    init_tracing();
    let config = config(&[]);
    let seen_at_generate_files = Rc::new(Cell::new(false));

    let mut generator = Generator::new(&config);
    generator.bus_mut().on_before_input_type(|event, ctx, _| {
        if event.input_type.name == "UserWhereInput" {
            ctx.registry.remove_types.insert("PostListRelationFilter".to_string());
        }
        Ok(())
    });
    let seen = Rc::clone(&seen_at_generate_files);
    generator.bus_mut().on_generate_files(move |_, ctx, _| {
        seen.set(ctx.registry.remove_types.contains("PostListRelationFilter"));
        Ok(())
    });

    let mut emitter = InMemoryEmitter::new();
    generator.run(&document(), &mut emitter).unwrap();

    assert!(seen_at_generate_files.get());
    let user_where = class_file(&emitter, "UserWhereInput").unwrap();
    assert!(user_where.class().unwrap().property("posts").is_none());
    assert!(user_where.class().unwrap().property("name").is_some());
}

#[test]
fn test_lazy_binding_defers_cycles() {
    let (emitter, report) = run(&[("esmCompatible", "true")]);

    assert!(report.circular_pairs.contains(&"Post:User".to_string()));
    assert!(report
        .circular_pairs
        .contains(&"PostListRelationFilter:UserWhereInput".to_string()));

    let user = emitter.text("user/user.model.ts").unwrap();
    assert!(user.contains("import type { Post } from '../post/post.model';"));
    assert!(user.contains("@Field(() => [getType('Post')], {nullable:false})"));
    assert!(user.ends_with("registerType('User', User);\n"));

    let post = emitter.text("post/post.model.ts").unwrap();
    assert!(post.contains("@Field(() => getType('User'), {nullable:false})"));
    assert!(post.contains("import type { User } from '../user/user.model';"));

    let user_where = class_file(&emitter, "UserWhereInput").unwrap().text();
    assert!(user_where.contains("import type { PostListRelationFilter }"));
    assert!(user_where.contains("@Field(() => getType('PostListRelationFilter'), {nullable:true})"));

    assert!(emitter.get("type-registry.ts").is_some());
    let manifest = emitter.text("register-all-types.ts").unwrap();
    assert!(manifest.contains("import './user/user.model.js';"));
    assert!(manifest.contains("    'UserWhereInput',"));
    assert!(!manifest.contains("role.enum"));
}

#[test]
fn test_manifest_only_imports_surviving_files() {
    init_tracing();
    let mut document = document();
    document
        .schema
        .input_object_types
        .prisma
        .push(input("StringFieldUpdateOperationsInput", vec![arg("set", false, vec![scalar("String")])]));

    let config = config(&[("esmCompatible", "true"), ("noAtomicOperations", "true")]);
    let mut emitter = InMemoryEmitter::new();
    let report = generate_with(&document, &config, &mut emitter).unwrap();

    assert!(class_file(&emitter, "StringFieldUpdateOperationsInput").is_none());
    let manifest = emitter.text("register-all-types.ts").unwrap();
    let missing: Vec<String> = manifest
        .lines()
        .filter_map(|line| line.strip_prefix("import './")?.strip_suffix(".js';"))
        .map(|module| format!("{module}.ts"))
        .filter(|path| !report.files.contains(path))
        .collect();
    assert_eq!(missing, Vec::<String>::new());
    assert!(manifest.contains("import './user/user.model.js';"));
    assert!(!manifest.contains("StringFieldUpdateOperationsInput"));
}

#[test]
fn test_re_export_all() {
    let (emitter, _) = run(&[("reExport", "All")]);

    let root = emitter.text("index.ts").unwrap();
    assert!(root.contains("export * from './post/index.js';"));
    assert!(root.contains("export * from './prisma/index.js';"));
    assert!(root.contains("export * from './user/index.js';"));

    let user = emitter.text("user/index.ts").unwrap();
    assert!(user.contains("export * from './user.model.js';"));
    assert!(!user.contains("index.js"));
}

#[test]
fn test_emit_single_merges_into_index() {
    let (emitter, report) = run(&[("emitSingle", "true")]);

    assert_eq!(report.files, vec!["decimal-helpers.ts".to_string(), "index.ts".to_string()]);
    let index = emitter.text("index.ts").unwrap();
    assert!(index.contains("export class User {"));
    assert!(index.contains("author!: InstanceType<typeof User>;"));
    assert!(!index.contains("from './"));
    assert!(!index.contains("from '../"));

    let first_enum = index.find("export enum").unwrap();
    let first_class = index.find("export class").unwrap();
    assert!(first_enum < first_class);
}

#[test]
fn test_filesystem_run_with_purge() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("old")).unwrap();
    std::fs::write(dir.path().join("old/stale.model.ts"), "export class Stale {}\n").unwrap();

    let mut raw = RawConfig::new();
    raw.insert("purgeOutput".into(), "true".into());
    let report = generate(&document(), &raw, dir.path()).unwrap();

    assert!(!report.files.contains(&"old/stale.model.ts".to_string()));
    assert!(!dir.path().join("old").exists());
    let written = std::fs::read_to_string(dir.path().join("user/user.model.ts")).unwrap();
    assert!(written.contains("export class User {"));
    assert!(dir.path().join("decimal-helpers.ts").is_file());
}
