use std::io::Write;
use std::path::Path;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use tempfile::NamedTempFile;

use super::{
    edge_values, node_values, AttributeDecl, GexfDocument, EDGE_ATTRIBUTES, GEXF_NAMESPACE,
    GEXF_VERSION, NODE_ATTRIBUTES,
};
use crate::error::{Phase, Result, RoadGexfError};

type XmlWriter = Writer<Vec<u8>>;

fn start(w: &mut XmlWriter, el: BytesStart<'_>) -> quick_xml::Result<()> {
    w.write_event(Event::Start(el))?;
    Ok(())
}

fn end(w: &mut XmlWriter, name: &str) -> quick_xml::Result<()> {
    w.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

fn text_element(w: &mut XmlWriter, name: &str, text: &str) -> quick_xml::Result<()> {
    start(w, BytesStart::new(name))?;
    w.write_event(Event::Text(BytesText::new(text)))?;
    end(w, name)
}

fn write_attribute_decls(w: &mut XmlWriter, class: &str, decls: &[AttributeDecl]) -> quick_xml::Result<()> {
    let mut el = BytesStart::new("attributes");
    el.push_attribute(("class", class));
    start(w, el)?;
    for decl in decls {
        let id = decl.id.to_string();
        let mut attr = BytesStart::new("attribute");
        attr.push_attribute(("id", id.as_str()));
        attr.push_attribute(("title", decl.title));
        attr.push_attribute(("type", decl.ty.as_str()));
        w.write_event(Event::Empty(attr))?;
    }
    end(w, "attributes")
}

fn write_attvalues(w: &mut XmlWriter, values: &[(u8, String)]) -> quick_xml::Result<()> {
    start(w, BytesStart::new("attvalues"))?;
    for (index, value) in values {
        let index = index.to_string();
        let mut el = BytesStart::new("attvalue");
        el.push_attribute(("for", index.as_str()));
        el.push_attribute(("value", value.as_str()));
        w.write_event(Event::Empty(el))?;
    }
    end(w, "attvalues")
}

fn write_document(w: &mut XmlWriter, doc: &GexfDocument) -> quick_xml::Result<()> {
    w.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut root = BytesStart::new("gexf");
    root.push_attribute(("xmlns", GEXF_NAMESPACE));
    root.push_attribute(("version", GEXF_VERSION));
    start(w, root)?;

    let date = doc.meta.last_modified.format("%Y-%m-%d").to_string();
    let mut meta = BytesStart::new("meta");
    meta.push_attribute(("lastmodifieddate", date.as_str()));
    start(w, meta)?;
    text_element(w, "creator", &doc.meta.creator)?;
    text_element(w, "description", &doc.meta.description)?;
    end(w, "meta")?;

    let mut graph = BytesStart::new("graph");
    graph.push_attribute(("mode", "static"));
    graph.push_attribute(("defaultedgetype", "directed"));
    start(w, graph)?;

    start(w, BytesStart::new("nodes"))?;
    write_attribute_decls(w, "node", &NODE_ATTRIBUTES)?;
    for node in &doc.nodes {
        let id = node.id.to_string();
        let mut el = BytesStart::new("node");
        el.push_attribute(("id", id.as_str()));
        el.push_attribute(("label", id.as_str()));
        start(w, el)?;
        write_attvalues(w, &node_values(node))?;
        end(w, "node")?;
    }
    end(w, "nodes")?;

    start(w, BytesStart::new("edges"))?;
    write_attribute_decls(w, "edge", &EDGE_ATTRIBUTES)?;
    for edge in &doc.edges {
        // Street names are not written: `label` stays off edge elements
        let id = edge.id.to_string();
        let source = edge.source.to_string();
        let target = edge.target.to_string();
        let weight = edge.weight.to_string();
        let mut el = BytesStart::new("edge");
        el.push_attribute(("id", id.as_str()));
        el.push_attribute(("source", source.as_str()));
        el.push_attribute(("target", target.as_str()));
        el.push_attribute(("weight", weight.as_str()));
        start(w, el)?;
        write_attvalues(w, &edge_values(edge))?;
        end(w, "edge")?;
    }
    end(w, "edges")?;

    end(w, "graph")?;
    end(w, "gexf")
}

/// Encode the whole document to indented UTF-8 bytes.
pub fn encode(doc: &GexfDocument) -> Result<Vec<u8>> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    write_document(&mut writer, doc).map_err(|e| {
        let source = std::io::Error::new(std::io::ErrorKind::Other, e.to_string());
        RoadGexfError::io(Phase::Encode, "<memory>", source)
    })?;
    let mut bytes = writer.into_inner();
    bytes.push(b'\n');
    log::debug!(
        "Encoded {} nodes and {} edges into {} bytes",
        doc.nodes.len(),
        doc.edges.len(),
        bytes.len()
    );
    Ok(bytes)
}

/// Write `bytes` to `path` in one step.
///
/// The data goes to a temporary file beside `path` that is renamed over it
/// only once fully written and synced. On any failure the temporary file is
/// removed and `path` is left untouched.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let io_error = |e: std::io::Error| RoadGexfError::io(Phase::Write, path, e);

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(io_error)?;
    tmp.write_all(bytes).map_err(io_error)?;
    tmp.as_file().sync_all().map_err(io_error)?;
    tmp.persist(path).map_err(|e| io_error(e.error))?;

    log::info!("Wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}
