use super::network::Network;

use graphviz_rust::{
    cmd::{CommandArg, Format},
    dot_structures::{
        Attribute, Edge, EdgeTy, Graph, GraphAttributes, Id, Node, NodeId, Stmt, Vertex,
    },
    exec, print,
    printer::PrinterContext,
};

fn node_id(i: u32) -> NodeId {
    NodeId(Id::Plain(format!("n{}", i)), None)
}

fn attr(key: &str, value: &str) -> Attribute {
    Attribute(Id::Plain(key.into()), Id::Plain(value.into()))
}

/// Directed graph of the network; edges are labelled with their current weight.
pub fn to_graph(network: &Network) -> Graph {
    let mut g = Graph::DiGraph {
        id: Id::Plain("network".to_string()),
        strict: false,
        stmts: Vec::new(),
    };

    g.add_stmt(Stmt::GAttribute(GraphAttributes::Graph(vec![
        attr("layout", "neato"),
        attr("overlap", "false"),
        attr("splines", "line"),
    ])));

    for unit in network.nodes() {
        let normalizing = !unit.incoming().is_empty();
        let node = Node::new(
            node_id(unit.id().0),
            vec![
                attr("shape", if normalizing { "doublecircle" } else { "circle" }),
                Attribute(
                    Id::Plain("label".into()),
                    Id::Escaped(format!("\"{}\"", unit.id().0)),
                ),
            ],
        );
        g.add_stmt(Stmt::Node(node));
    }

    for (_, c) in network.connections().iter() {
        let edge = Edge {
            ty: EdgeTy::Pair(Vertex::N(node_id(c.source.0)), Vertex::N(node_id(c.target.0))),
            attributes: vec![Attribute(
                Id::Plain("label".into()),
                Id::Escaped(format!("\"{:.3}\"", c.weight)),
            )],
        };
        g.add_stmt(Stmt::Edge(edge));
    }

    g
}

pub fn to_dot(network: &Network) -> String {
    print(to_graph(network), &mut PrinterContext::default())
}

/// Render with Graphviz' **neato** engine. Needs a Graphviz installation.
pub fn to_neato_png(network: &Network) -> std::io::Result<Vec<u8>> {
    let mut ctx = PrinterContext::default();
    exec(to_graph(network), &mut ctx, vec![CommandArg::Format(Format::Png)])
}
