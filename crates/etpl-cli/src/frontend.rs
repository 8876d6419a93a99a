//! Surface-parser trait and the JSON IR stand-in (§11.2).
//!
//! `SPEC_FULL.md` §6.2 describes a full grammar-level surface parser for
//! eTPL source text; building one is out of scope here (see `DESIGN.md`'s
//! Non-goals note — `etpl-resolve`/`etpl-checker`/`etpl-algebra` already
//! exercise the semantics a grammar parser would feed them). What the CLI
//! needs is a `SurfaceParser` seam and at least one working implementation,
//! so §11.2's JSON IR interchange format is that implementation: a tree of
//! nodes mirroring `core.py`'s constructor keyword arguments (`name`,
//! `kind`, `members`, `args`, ...), built bottom-up into a `Collection` via
//! `alloc`/`add_top_level` rather than a flat dump of arena indices (a
//! `DefId` is a `Collection`-internal allocation detail, not something a
//! hand-authored fixture should know about).

use indexmap::IndexMap;
use rustc_hash::FxHashSet;
use serde::Deserialize;

use etpl_common::SizeUnit;
use etpl_ir::{
    CaseDef, Collection, DefCommon, DefFlags, DefId, DefaultCaseDef, Definition, DynamicVectorDef,
    EnumDef, EnumItem, FixedDef, FixedKind, FragmentDef, InstanceDef, IntElement, OpaqueDef,
    SelectDef, Size, StaticVectorDef, StructDef,
};

use crate::error::PipelineError;

/// Produces a fresh [`Collection`] in `CollectionState::Raw` from some
/// external representation.
pub trait SurfaceParser {
    fn parse(&self, source: &str) -> Result<Collection, PipelineError>;
}

/// Reads the JSON IR interchange format (§11.2).
#[derive(Default)]
pub struct JsonIrParser;

impl SurfaceParser for JsonIrParser {
    fn parse(&self, source: &str) -> Result<Collection, PipelineError> {
        let doc: JsonDoc = serde_json::from_str(source)?;
        let mut collection = Collection::new(FxHashSet::from_iter(doc.global_symbols));
        for node in &doc.types {
            build(&mut collection, node, DefId::ROOT, true)?;
        }
        Ok(collection)
    }
}

#[derive(Deserialize)]
struct JsonDoc {
    #[serde(default)]
    global_symbols: Vec<String>,
    types: Vec<JsonNode>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct JsonNode {
    kind: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    line: Option<u32>,
    #[serde(default)]
    flags: Vec<String>,
    #[serde(default)]
    size: Option<JsonSize>,
    #[serde(default)]
    params: Vec<String>,

    // int
    #[serde(default)]
    width: Option<u8>,
    #[serde(default)]
    signed: bool,

    // instance
    #[serde(rename = "type", default)]
    type_name: Option<String>,
    #[serde(default)]
    args: IndexMap<String, IntElement>,

    // const
    #[serde(default)]
    value: Option<i64>,

    // vectors / fragment
    #[serde(default)]
    element: Option<Box<JsonNode>>,
    #[serde(default)]
    length: Option<IntElement>,
    #[serde(default)]
    length_min: Option<i64>,
    #[serde(default)]
    length_max: Option<i64>,
    #[serde(default)]
    unit: Option<JsonSizeUnit>,
    #[serde(default)]
    item_based: bool,

    // enum
    #[serde(default)]
    items: Vec<EnumItem>,

    // struct / case / default_case
    #[serde(default)]
    members: Vec<JsonNode>,

    // select
    #[serde(default)]
    test_symbol: Option<String>,
    #[serde(default)]
    cases: Vec<JsonNode>,
    #[serde(default)]
    cond: Vec<String>,
}

#[derive(Deserialize)]
struct JsonSize {
    value: IntElement,
    unit: JsonSizeUnit,
}

#[derive(Deserialize, Clone, Copy)]
#[serde(rename_all = "lowercase")]
enum JsonSizeUnit {
    Bit,
    Byte,
}

impl From<JsonSizeUnit> for SizeUnit {
    fn from(u: JsonSizeUnit) -> Self {
        match u {
            JsonSizeUnit::Bit => SizeUnit::Bit,
            JsonSizeUnit::Byte => SizeUnit::Byte,
        }
    }
}

fn parse_flags(flags: &[String]) -> DefFlags {
    let mut out = DefFlags::empty();
    for f in flags {
        out |= match f.as_str() {
            "extern" => DefFlags::EXTERN,
            "optional" => DefFlags::OPTIONAL,
            "distinctive" => DefFlags::DISTINCTIVE,
            _ => DefFlags::empty(),
        };
    }
    out
}

fn common(node: &JsonNode, parent: DefId) -> DefCommon {
    let mut c = DefCommon::new(node.name.clone(), parent);
    c.flags = parse_flags(&node.flags);
    c.params = node.params.clone();
    c.line = node.line;
    c.size = node.size.as_ref().map(|s| Size::new(s.value.clone(), s.unit.into()));
    c
}

/// Builds `node` (and, recursively, everything it points at) into
/// `collection`, returning the new node's `DefId`. `top_level` marks
/// whether this call should register the node as a direct child of the
/// Collection root (`true` for entries in the document's `types` list,
/// `false` for anything nested inside a member/element/case list).
fn build(collection: &mut Collection, node: &JsonNode, parent: DefId, top_level: bool) -> Result<DefId, PipelineError> {
    match node.kind.as_str() {
        "int" => {
            let width = node.width.ok_or_else(|| PipelineError::Parse(format!("int \"{}\" is missing \"width\"", node.name)))?;
            let def = Definition::Int(etpl_ir::IntDef {
                common: common(node, parent),
                width,
                signedness: if node.signed { etpl_common::Signedness::Signed } else { etpl_common::Signedness::Unsigned },
            });
            alloc(collection, def, top_level)
        }
        "bit" | "byte" => {
            let def = Definition::Fixed(FixedDef {
                common: common(node, parent),
                kind: if node.kind == "bit" { FixedKind::Bit } else { FixedKind::Byte },
            });
            alloc(collection, def, top_level)
        }
        "opaque" => alloc(collection, Definition::Opaque(OpaqueDef { common: common(node, parent) }), top_level),
        "const" => {
            let value = node.value.ok_or_else(|| PipelineError::Parse(format!("const \"{}\" is missing \"value\"", node.name)))?;
            alloc(collection, Definition::Const(etpl_ir::ConstDef { common: common(node, parent), value }), top_level)
        }
        "instance" => {
            let type_name = node
                .type_name
                .clone()
                .ok_or_else(|| PipelineError::Parse(format!("instance \"{}\" is missing \"type\"", node.name)))?;
            let def = Definition::Instance(Box::new(InstanceDef { common: common(node, parent), type_name, args: node.args.clone() }));
            alloc(collection, def, top_level)
        }
        "static_vector" => {
            let elem_node = node
                .element
                .as_deref()
                .ok_or_else(|| PipelineError::Parse(format!("static_vector \"{}\" is missing \"element\"", node.name)))?;
            let id = collection.alloc(placeholder(parent));
            let element = build(collection, elem_node, id, false)?;
            let def = Definition::StaticVector(Box::new(StaticVectorDef {
                common: common(node, parent),
                element,
                length: node.length.clone(),
                unit: node.unit.map_or(SizeUnit::Byte, Into::into),
                item_based: node.item_based,
            }));
            *collection.get_mut(id) = def;
            finish(collection, id, top_level)
        }
        "dynamic_vector" => {
            let elem_node = node
                .element
                .as_deref()
                .ok_or_else(|| PipelineError::Parse(format!("dynamic_vector \"{}\" is missing \"element\"", node.name)))?;
            let id = collection.alloc(placeholder(parent));
            let element = build(collection, elem_node, id, false)?;
            let def = Definition::DynamicVector(Box::new(DynamicVectorDef {
                common: common(node, parent),
                element,
                length_min: node.length_min.unwrap_or(0),
                length_max: node.length_max.unwrap_or(i64::MAX),
                unit: node.unit.map_or(SizeUnit::Byte, Into::into),
                item_based: node.item_based,
            }));
            *collection.get_mut(id) = def;
            finish(collection, id, top_level)
        }
        "fragment" => {
            let elem_node = node
                .element
                .as_deref()
                .ok_or_else(|| PipelineError::Parse(format!("fragment \"{}\" is missing \"element\"", node.name)))?;
            let id = collection.alloc(placeholder(parent));
            let element = build(collection, elem_node, id, false)?;
            *collection.get_mut(id) = Definition::Fragment(Box::new(FragmentDef { common: common(node, parent), element }));
            finish(collection, id, top_level)
        }
        "enum" => alloc(collection, Definition::Enum(EnumDef { common: common(node, parent), items: node.items.clone() }), top_level),
        "struct" => {
            let id = collection.alloc(placeholder(parent));
            let members = build_members(collection, &node.members, id)?;
            *collection.get_mut(id) = Definition::Struct(StructDef { common: common(node, parent), members });
            finish(collection, id, top_level)
        }
        "case" => {
            let id = collection.alloc(placeholder(parent));
            let members = build_members(collection, &node.members, id)?;
            *collection.get_mut(id) = Definition::Case(CaseDef { common: common(node, parent), cond: node.cond.clone(), members });
            finish(collection, id, top_level)
        }
        "default_case" => {
            let id = collection.alloc(placeholder(parent));
            let members = build_members(collection, &node.members, id)?;
            *collection.get_mut(id) = Definition::DefaultCase(DefaultCaseDef { common: common(node, parent), members });
            finish(collection, id, top_level)
        }
        "select" => {
            let test_symbol = node
                .test_symbol
                .clone()
                .ok_or_else(|| PipelineError::Parse(format!("select \"{}\" is missing \"test_symbol\"", node.name)))?;
            let id = collection.alloc(placeholder(parent));
            let mut cases = Vec::with_capacity(node.cases.len());
            for case in &node.cases {
                cases.push(build(collection, case, id, false)?);
            }
            *collection.get_mut(id) = Definition::Select(Box::new(SelectDef { common: common(node, parent), test_symbol, cases }));
            finish(collection, id, top_level)
        }
        other => Err(PipelineError::Parse(format!("unknown definition kind \"{other}\""))),
    }
}

fn build_members(collection: &mut Collection, members: &[JsonNode], owner: DefId) -> Result<Vec<DefId>, PipelineError> {
    members.iter().map(|m| build(collection, m, owner, false)).collect()
}

/// A throwaway placeholder occupying an arena slot before its real contents
/// (which need that slot's `DefId` to reference their own members/element)
/// are known.
fn placeholder(parent: DefId) -> Definition {
    Definition::Opaque(OpaqueDef { common: DefCommon::new(String::new(), parent) })
}

fn alloc(collection: &mut Collection, def: Definition, top_level: bool) -> Result<DefId, PipelineError> {
    if top_level {
        Ok(collection.add_top_level(def, false)?)
    } else {
        Ok(collection.alloc(def))
    }
}

fn finish(collection: &mut Collection, id: DefId, top_level: bool) -> Result<DefId, PipelineError> {
    if top_level {
        collection.promote_to_top_level(id)?;
    }
    Ok(id)
}
