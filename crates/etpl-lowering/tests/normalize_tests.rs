use indexmap::IndexMap;
use rustc_hash::FxHashSet;

use etpl_ir::{
    Collection, DefCommon, DefId, Definition, DynamicVectorDef, InstanceDef, StaticVectorDef,
    StructDef,
};
use etpl_lowering::normalize;

#[test]
fn plain_struct_field_is_hoisted_to_a_top_level_alias() {
    let mut src = Collection::new(FxHashSet::default());
    let field = src.alloc(Definition::Instance(Box::new(InstanceDef {
        common: DefCommon::new("version", DefId::ROOT),
        type_name: "uint8".into(),
        args: IndexMap::new(),
    })));
    let struct_id = src
        .add_top_level(
            Definition::Struct(StructDef {
                common: DefCommon::new("Packet", DefId::ROOT),
                members: vec![field],
            }),
            false,
        )
        .unwrap();
    src.get_mut(field).common_mut().parent = struct_id;

    let out = normalize(&src).unwrap();
    let packet_id = out.lookup("Packet").unwrap();
    let Definition::Struct(packet) = out.get(packet_id) else {
        panic!("expected struct")
    };
    assert_eq!(packet.members.len(), 1);

    let member_id = packet.members[0];
    let Definition::Instance(member) = out.get(member_id) else {
        panic!("expected instance")
    };
    assert_eq!(member.common.name, "version");
    // the hoisted definition exists at top level, named by its chained path
    assert!(out.lookup(&member.type_name).is_some());
    assert_ne!(member.type_name, "version");
}

#[test]
fn dynamic_vector_lowers_to_struct_with_length_and_payload() {
    let mut src = Collection::new(FxHashSet::default());
    let elem = src.alloc(Definition::Instance(Box::new(InstanceDef {
        common: DefCommon::new("", DefId::ROOT),
        type_name: "uint8".into(),
        args: IndexMap::new(),
    })));
    let dv_id = src
        .add_top_level(
            Definition::DynamicVector(Box::new(DynamicVectorDef {
                common: DefCommon::new("Payload", DefId::ROOT),
                element: elem,
                length_min: 0,
                length_max: 255,
                unit: etpl_common::SizeUnit::Byte,
                item_based: true,
            })),
            false,
        )
        .unwrap();
    src.get_mut(elem).common_mut().parent = dv_id;

    let out = normalize(&src).unwrap();
    let payload_id = out.lookup("Payload").unwrap();
    let Definition::Struct(s) = out.get(payload_id) else {
        panic!("expected struct")
    };
    assert_eq!(s.members.len(), 2);

    let Definition::Instance(n_field) = out.get(s.members[0]) else {
        panic!("expected instance")
    };
    assert_eq!(n_field.common.name, "_N");
    assert_eq!(n_field.type_name, "uint8");

    let v_field = out.get(s.members[1]);
    assert_eq!(v_field.name(), "_V");
}

#[test]
fn static_vector_of_opaque_collapses_to_an_opaque_field() {
    let mut src = Collection::new(FxHashSet::default());
    let elem = src.alloc(Definition::Instance(Box::new(InstanceDef {
        common: DefCommon::new("", DefId::ROOT),
        type_name: "opaque".into(),
        args: IndexMap::new(),
    })));
    let sv_id = src
        .add_top_level(
            Definition::StaticVector(Box::new(StaticVectorDef {
                common: DefCommon::new("Blob", DefId::ROOT),
                element: elem,
                length: Some(etpl_ir::IntElement::Literal(16)),
                unit: etpl_common::SizeUnit::Byte,
                item_based: false,
            })),
            false,
        )
        .unwrap();
    src.get_mut(elem).common_mut().parent = sv_id;

    let out = normalize(&src).unwrap();
    let blob_id = out.lookup("Blob").unwrap();
    let Definition::Instance(inst) = out.get(blob_id) else {
        panic!("expected instance")
    };
    assert_eq!(inst.type_name, "opaque");
}

#[test]
fn struct_member_named_blank_gets_synthetic_name() {
    let mut src = Collection::new(FxHashSet::default());
    let field = src.alloc(Definition::Instance(Box::new(InstanceDef {
        common: DefCommon::new("", DefId::ROOT),
        type_name: "byte".into(),
        args: IndexMap::new(),
    })));
    let struct_id = src
        .add_top_level(
            Definition::Struct(StructDef {
                common: DefCommon::new("Anon", DefId::ROOT),
                members: vec![field],
            }),
            false,
        )
        .unwrap();
    src.get_mut(field).common_mut().parent = struct_id;

    let out = normalize(&src).unwrap();
    let anon_id = out.lookup("Anon").unwrap();
    let Definition::Struct(s) = out.get(anon_id) else {
        panic!("expected struct")
    };
    let Definition::Instance(member) = out.get(s.members[0]) else {
        panic!("expected instance")
    };
    assert_eq!(member.common.name, "_M0");
}
