// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use stepline_graph::{LineStore, ModelGraph};

// Project -> site -> building -> storey, storey contains a wall and a
// slab, one property set on the wall, one aggregate with a dangling
// relating side.
const TOWER: &str = "\
ISO-10303-21;
HEADER;
FILE_DESCRIPTION((''),'2;1');
FILE_NAME('tower.ifc','2024-01-12T09:30:00',(''),(''),'','','');
FILE_SCHEMA(('IFC4'));
ENDSEC;
DATA;
#1=IFCPROJECT('2O2Fr$t4X7Zf8NOew3FLOH',$,'Tower',$,$,$,$,(#60),#61);
#2=IFCSITE('3shyidj3nASe9bQ0uDPb1D',$,'Site',$,$,#70,$,$,.ELEMENT.,(51,30,0,0),(0,7,0,0),0.,$,$);
#3=IFCBUILDING('0kF45Qs8L9vhM2tJGXjqcY',$,'Block A',$,$,#70,$,$,.ELEMENT.,$,$,$);
#4=IFCBUILDINGSTOREY('1hqIFTRjfV6u6cSnUWqNxa',$,'Level 1',$,$,#70,$,$,.ELEMENT.,0.);
#10=IFCWALL('2um$kzpGv1wuo3k0P1Xc9g',$,'Wall; north',$,$,#70,$,$,.SOLIDWALL.);
#11=IFCSLAB('3W8GDkmXr2mf2JhIlaRkrV',$,'Floor',$,$,#70,$,$,.FLOOR.);
#20=IFCRELAGGREGATES('0yZ0Sb5Kj3AuDI2bSCDB4A',$,$,$,#1,(#2));
#21=IFCRELAGGREGATES('1B$ueiUM10cQnLwG3Qi7Wo',$,$,$,#2,(#3));
#22=IFCRELAGGREGATES('2Xb6mUvASAIfUInyowQos1',$,$,$,#3,(#4));
#23=IFCRELCONTAINEDINSPATIALSTRUCTURE('3bkkPXvWv6wROdzLpQ87Xm',$,'Level 1 contents',$,(#10,#11),#4);
#30=IFCPROPERTYSINGLEVALUE('IsExternal',$,IFCBOOLEAN(.T.),$);
#31=IFCPROPERTYSINGLEVALUE('FireRating',$,IFCLABEL('REI 60'),$);
#40=IFCPROPERTYSET('0EF5_zZRr1AQkYUy4Pq0lj',$,'Pset_WallCommon',$,(#30,#31));
#41=IFCRELAGGREGATES('2fCVLzYgn0au57KCYz1Wg8',$,$,$,#99,(#4));
#70=IFCLOCALPLACEMENT($,#71);
#71=IFCAXIS2PLACEMENT3D(#72,$,$);
#72=IFCCARTESIANPOINT((0.,0.,0.));
ENDSEC;
END-ISO-10303-21;
";

fn build_tower() -> ModelGraph {
    let mut store = LineStore::new(TOWER);
    ModelGraph::build(&mut store)
}

#[test]
fn test_spatial_hierarchy() {
    let graph = build_tower();

    // Three aggregates plus one containment, the dangling #41 dropped
    assert_eq!(graph.relations().len(), 4);
    assert_eq!(graph.node_count(), 6);

    // The project is the only root, the elements are the only leaves
    assert_eq!(graph.source_ids(), vec![1]);
    assert_eq!(graph.sink_ids(), vec![10, 11]);

    assert_eq!(graph.related_ids(1), &[2]);
    assert_eq!(graph.related_ids(2), &[3]);
    assert_eq!(graph.related_ids(3), &[4]);
    assert!(graph.related_ids(10).is_empty());
}

#[test]
fn test_containment_edges() {
    let graph = build_tower();

    let containment = graph
        .relations()
        .iter()
        .find(|r| r.rel_id == 23)
        .expect("containment relation missing");
    assert_eq!(containment.source, 4);
    assert_eq!(containment.targets.as_slice(), &[10, 11]);
    assert_eq!(graph.related_ids(4), &[10, 11]);
}

#[test]
fn test_nodes_carry_parsed_records() {
    let graph = build_tower();

    let wall = graph.node(10).expect("wall should be a graph node");
    assert_eq!(wall.type_name, "IFCWALL");
    assert_eq!(wall.get_text(2), Some("Wall; north"));

    let storey = graph.node(4).expect("storey should be a graph node");
    assert_eq!(storey.type_name, "IFCBUILDINGSTOREY");

    // The placement tree never participates in a relation
    assert!(graph.node(70).is_none());
}

#[test]
fn test_property_sets() {
    let graph = build_tower();

    assert_eq!(graph.prop_sets().count(), 1);
    let pset = graph.prop_set(40).expect("property set missing");
    assert_eq!(pset.guid, "0EF5_zZRr1AQkYUy4Pq0lj");
    assert_eq!(pset.name, "Pset_WallCommon");
    assert_eq!(pset.properties.as_slice(), &[30, 31]);

    // Properties are kept as references, not pulled into the node set
    assert!(graph.node(30).is_none());
}

#[test]
fn test_dangling_relation_does_not_poison_build() {
    let graph = build_tower();

    // #41 relates the missing #99; it must not appear as a relation and
    // its well formed target must not be duplicated
    assert!(graph.relations().iter().all(|r| r.rel_id != 41));
    assert_eq!(graph.related_ids(3), &[4]);
}

#[test]
fn test_store_survives_graph_build() {
    let mut store = LineStore::new(TOWER);
    let _graph = ModelGraph::build(&mut store);

    // Lines outside the graph stay reachable through the store
    let point = store.record(72).expect("point line should parse");
    assert_eq!(point.type_name, "IFCCARTESIANPOINT");
    let coords = point.get_list(0).expect("coordinate list");
    assert_eq!(coords.len(), 3);
}
