use nodewise::behaviors::picker;
use nodewise::{BehaviorEngine, Control, DataType, Node, NodeGraph, SavedNode};
use egui::Pos2;

fn print_node(graph: &NodeGraph, id: usize, heading: &str) {
    let node = &graph.nodes[&id];
    println!("--- {} ---", heading);
    for input in &node.inputs {
        let state = if input.is_linked() { "linked" } else { "open" };
        match &input.label {
            Some(label) => println!("  input {:<8} [{}] \"{}\"", input.name, state, label),
            None => println!("  input {:<8} [{}]", input.name, state),
        }
    }
    for control in &node.controls {
        let state = if control.is_hidden() { "hidden" } else { "shown" };
        println!("  control {:<22} [{}] = {:?}", control.name, state, control.value.get());
    }
    println!("  size: {:.0} x {:.0}", node.size.x, node.size.y);
}

fn note_source(graph: &mut NodeGraph, text: &str) -> usize {
    let mut node = Node::new(0, "Notes", Pos2::new(50.0, 50.0));
    node.add_control(Control::text_area("text", text));
    node.add_output("text", DataType::String);
    graph.add_node(node)
}

fn main() {
    env_logger::init();
    println!("Picker session walkthrough...");

    let mut engine = BehaviorEngine::new();
    let mut graph = NodeGraph::new();

    // Spawn a picker; its behavior trims the input family to one open
    // slot and installs the refresh button
    let picker_id = graph.add_node(picker::template(Pos2::new(400.0, 100.0)));
    engine.node_created(&mut graph, picker_id);

    // The host attaches the seed's companion field after construction,
    // which is why the first visibility pass runs deferred
    graph
        .nodes
        .get_mut(&picker_id)
        .unwrap()
        .add_control(Control::combo("control_after_generate", "randomize"));
    engine.settle(&mut graph);
    print_node(&graph, picker_id, "freshly created (manual mode)");

    // Feed it two note nodes; each take of the last slot grows a spare
    let notes_a = note_source(&mut graph, "alpha\nbeta\ngamma");
    let notes_b = note_source(&mut graph, "one\n\ntwo");
    for (source, slot) in [(notes_a, "text_1"), (notes_b, "text_2")] {
        match engine.connect(&mut graph, source, "text", picker_id, slot) {
            Ok(link) => println!("connected notes to {} as link {}", slot, link),
            Err(err) => println!("connection to {} failed: {}", slot, err),
        }
    }

    // Annotate each linked slot with the line count of its source
    engine.press_button(&mut graph, picker_id, picker::REFRESH_CONTROL);
    print_node(&graph, picker_id, "two sources connected, labels refreshed");

    // Switching the driver hides the manual side and reveals the random
    // side, companion included
    engine.set_control_value(&mut graph, picker_id, "mode", "random");
    engine.set_control_value(&mut graph, picker_id, "seed", 1234);
    print_node(&graph, picker_id, "switched to random mode");

    // Round-trip through the saved record
    let saved = SavedNode::capture(&graph.nodes[&picker_id]);
    let json = saved.to_json().expect("saved record serializes");
    println!("saved record: {}", json);

    let mut restored_engine = BehaviorEngine::new();
    let mut restored_graph = NodeGraph::new();
    let restored_id = restored_graph.add_node(picker::template(Pos2::new(400.0, 100.0)));
    restored_engine.node_created(&mut restored_graph, restored_id);
    restored_graph
        .nodes
        .get_mut(&restored_id)
        .unwrap()
        .add_control(Control::combo("control_after_generate", "randomize"));

    let reloaded = SavedNode::from_json(&json).expect("saved record parses");
    restored_engine.node_configured(&mut restored_graph, restored_id, &reloaded);
    restored_engine.settle(&mut restored_graph);
    print_node(
        &restored_graph,
        restored_id,
        "restored from the saved record (links not reattached)",
    );
}
