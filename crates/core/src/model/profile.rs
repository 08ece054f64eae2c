use bfg_protocol::SharedStr;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use super::CallNode;

/// Relative slack when comparing a parent's count with its children's sum;
/// counts are floating-point seconds summed by the backend.
const CONSISTENCY_TOLERANCE: f64 = 1e-9;

/// Deepest call stack accepted from `profile.json`. Parsing, conversion and
/// teardown all recurse once per frame, so deeper trees are rejected before
/// any of them run.
pub const MAX_CALL_DEPTH: usize = 256;

/// JSON nesting of a `MAX_CALL_DEPTH` tree: two levels per frame (node
/// object, `stack`/`children` array) plus the document and envelope objects.
const MAX_JSON_NESTING: usize = 2 * MAX_CALL_DEPTH + 2;

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("profile document has no \"c\" member")]
    MissingBody,
    #[error("{path}: stack is empty")]
    EmptyStack { path: String },
    #[error("{path}: first stack element is not a string")]
    NonStringLabel { path: String },
    #[error("{path}: invalid sample count {value}")]
    InvalidSampleCount { path: String, value: f64 },
    #[error("invalid run time {0}")]
    InvalidRunTime(f64),
    #[error("call tree is deeper than {limit} frames")]
    TooDeep { limit: usize },
}

/// Call node as served by the backend. `stack[0]` is the display label;
/// the remaining entries (file, line, ...) are not used for rendering.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireNode {
    stack: Vec<Value>,
    sample_count: f64,
    #[serde(default)]
    children: Vec<WireNode>,
}

/// Envelope form of the body: `{ callStats, runTime, totalSamples }`.
/// `callStats` may be an empty object when nothing was sampled.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireEnvelope {
    call_stats: Value,
    #[serde(default)]
    run_time: Option<f64>,
    #[serde(default)]
    total_samples: Option<f64>,
}

/// The call tree currently on display, plus the run time the time axis is
/// scaled to. Replaced wholesale on every successful fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileSnapshot {
    root: Option<CallNode>,
    run_time: f64,
    total_samples: Option<f64>,
    inconsistent_nodes: usize,
}

impl ProfileSnapshot {
    /// Snapshot of an in-memory tree; run time is the root's weight.
    pub fn new(root: CallNode) -> Self {
        let run_time = root.total();
        Self {
            root: Some(root),
            run_time,
            total_samples: None,
            inconsistent_nodes: 0,
        }
    }

    /// Parse and validate a `profile.json` document.
    ///
    /// Returns `Ok(None)` for an empty body or a `null` document / body,
    /// meaning the backend has no profile yet. Trees deeper than
    /// [`MAX_CALL_DEPTH`] frames fail with [`ProfileError::TooDeep`].
    pub fn from_json(data: &[u8]) -> Result<Option<Self>, ProfileError> {
        if data.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        if exceeds_nesting(data, MAX_JSON_NESTING) {
            return Err(ProfileError::TooDeep {
                limit: MAX_CALL_DEPTH,
            });
        }

        // Nesting is bounded above, but past serde_json's default limit
        // of 128 levels.
        let mut de = serde_json::Deserializer::from_slice(data);
        de.disable_recursion_limit();
        let document = Value::deserialize(&mut de)?;
        de.end()?;

        let body = match document {
            Value::Null => return Ok(None),
            Value::Object(mut map) => map.remove("c").ok_or(ProfileError::MissingBody)?,
            _ => return Err(ProfileError::MissingBody),
        };
        if body.is_null() {
            return Ok(None);
        }

        let snapshot = if body.get("callStats").is_some() {
            let envelope: WireEnvelope = serde_json::from_value(body)?;
            let root = match envelope.call_stats {
                Value::Object(ref map) if map.is_empty() => None,
                stats => Some(serde_json::from_value::<WireNode>(stats)?),
            };
            Self::from_wire(root, "c.callStats", envelope.run_time, envelope.total_samples)?
        } else {
            let root: WireNode = serde_json::from_value(body)?;
            Self::from_wire(Some(root), "c", None, None)?
        };
        Ok(Some(snapshot))
    }

    fn from_wire(
        root: Option<WireNode>,
        root_path: &'static str,
        run_time: Option<f64>,
        total_samples: Option<f64>,
    ) -> Result<Self, ProfileError> {
        if let Some(rt) = run_time
            && (!rt.is_finite() || rt < 0.0)
        {
            return Err(ProfileError::InvalidRunTime(rt));
        }

        let mut converter = Converter {
            root_path,
            trail: Vec::new(),
            inconsistent: 0,
        };
        let root = root.map(|r| converter.convert(r)).transpose()?;
        if converter.inconsistent > 0 {
            log::warn!(
                "{} call node(s) report fewer samples than their children",
                converter.inconsistent
            );
        }

        let run_time = run_time.unwrap_or_else(|| root.as_ref().map_or(0.0, CallNode::total));
        Ok(Self {
            root,
            run_time,
            total_samples,
            inconsistent_nodes: converter.inconsistent,
        })
    }

    pub fn root(&self) -> Option<&CallNode> {
        self.root.as_ref()
    }

    /// Total run time in seconds; the time axis domain.
    pub fn run_time(&self) -> f64 {
        self.run_time
    }

    pub fn total_samples(&self) -> Option<f64> {
        self.total_samples
    }

    /// Nodes whose children sum to more than their own count.
    pub fn inconsistent_nodes(&self) -> usize {
        self.inconsistent_nodes
    }

    pub fn has_samples(&self) -> bool {
        self.root.as_ref().is_some_and(|r| r.total() > 0.0)
    }
}

/// Whether `[`/`{` nesting in `data` goes past `limit`. Brackets inside
/// strings are skipped; malformed input is left for the parser to report.
fn exceeds_nesting(data: &[u8], limit: usize) -> bool {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for &b in data {
        if in_string {
            match b {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'[' | b'{' => {
                depth += 1;
                if depth > limit {
                    return true;
                }
            }
            b']' | b'}' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    false
}

struct Converter {
    root_path: &'static str,
    /// Child indices from the root to the node being converted.
    trail: Vec<usize>,
    inconsistent: usize,
}

impl Converter {
    fn path(&self) -> String {
        let mut path = self.root_path.to_string();
        for i in &self.trail {
            path.push_str(&format!(".children[{i}]"));
        }
        path
    }

    fn convert(&mut self, node: WireNode) -> Result<CallNode, ProfileError> {
        let label = match node.stack.first() {
            None => return Err(ProfileError::EmptyStack { path: self.path() }),
            Some(Value::String(s)) => SharedStr::from(s.as_str()),
            Some(_) => return Err(ProfileError::NonStringLabel { path: self.path() }),
        };
        if !node.sample_count.is_finite() || node.sample_count < 0.0 {
            return Err(ProfileError::InvalidSampleCount {
                path: self.path(),
                value: node.sample_count,
            });
        }

        let mut children = Vec::with_capacity(node.children.len());
        for (i, child) in node.children.into_iter().enumerate() {
            self.trail.push(i);
            children.push(self.convert(child)?);
            self.trail.pop();
        }

        let call = CallNode {
            label,
            sample_count: node.sample_count,
            children,
        };
        let slack = CONSISTENCY_TOLERANCE * call.sample_count.max(1.0);
        if call.children_total() > call.sample_count + slack {
            log::debug!("{}: children exceed parent sample count", self.path());
            self.inconsistent += 1;
        }
        Ok(call)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Result<Option<ProfileSnapshot>, ProfileError> {
        ProfileSnapshot::from_json(json.as_bytes())
    }

    #[test]
    fn parses_direct_node_body() {
        let snapshot = parse(
            r#"{"c":{"stack":["root","main.py",1],"sampleCount":2.5,"children":[
                {"stack":["work"],"sampleCount":2.0,"children":[]}
            ]}}"#,
        )
        .expect("valid profile")
        .expect("profile present");
        let root = snapshot.root().map(|r| r.label.to_string());
        assert_eq!(root.as_deref(), Some("root"));
        assert_eq!(snapshot.run_time(), 2.5);
        assert!(snapshot.has_samples());
        assert_eq!(snapshot.inconsistent_nodes(), 0);
    }

    #[test]
    fn parses_envelope_body() {
        let snapshot = parse(
            r#"{"c":{"callStats":{"stack":["[app]","no data",0,10],"sampleCount":0,"children":[]},
                "runTime":10,"totalSamples":10}}"#,
        )
        .expect("valid profile")
        .expect("profile present");
        assert_eq!(snapshot.run_time(), 10.0);
        assert_eq!(snapshot.total_samples(), Some(10.0));
        assert!(!snapshot.has_samples());
    }

    #[test]
    fn empty_call_stats_has_no_root() {
        let snapshot = parse(r#"{"c":{"callStats":{},"runTime":0.001}}"#).expect("valid profile");
        assert!(snapshot.is_some_and(|s| s.root().is_none() && !s.has_samples()));
    }

    #[test]
    fn empty_or_null_means_no_profile_yet() {
        assert!(matches!(parse(""), Ok(None)));
        assert!(matches!(parse("  \n"), Ok(None)));
        assert!(matches!(parse("null"), Ok(None)));
        assert!(matches!(parse(r#"{"c":null}"#), Ok(None)));
    }

    #[test]
    fn rejects_malformed_trees() {
        assert!(matches!(parse("{"), Err(ProfileError::Json(_))));
        assert!(matches!(parse(r#"{"x":1}"#), Err(ProfileError::MissingBody)));
        assert!(matches!(parse("[1,2]"), Err(ProfileError::MissingBody)));

        let err = parse(
            r#"{"c":{"stack":["root"],"sampleCount":1,"children":[
                {"stack":["ok"],"sampleCount":0.5},
                {"stack":[],"sampleCount":0.5}
            ]}}"#,
        );
        match err {
            Err(ProfileError::EmptyStack { path }) => assert_eq!(path, "c.children[1]"),
            other => panic!("unexpected: {other:?}"),
        }

        assert!(matches!(
            parse(r#"{"c":{"stack":[42],"sampleCount":1}}"#),
            Err(ProfileError::NonStringLabel { .. })
        ));
        assert!(matches!(
            parse(r#"{"c":{"stack":["a"],"sampleCount":-1}}"#),
            Err(ProfileError::InvalidSampleCount { .. })
        ));
        assert!(matches!(
            parse(r#"{"c":{"callStats":{},"runTime":-3}}"#),
            Err(ProfileError::InvalidRunTime(_))
        ));
    }

    #[test]
    fn flags_children_exceeding_parent() {
        let snapshot = parse(
            r#"{"c":{"stack":["root"],"sampleCount":1,"children":[
                {"stack":["a"],"sampleCount":0.75},
                {"stack":["b"],"sampleCount":0.75}
            ]}}"#,
        )
        .expect("inconsistent counts are not an error");
        assert_eq!(snapshot.map(|s| s.inconsistent_nodes()), Some(1));
    }

    fn nested_profile(depth: usize, envelope: bool) -> String {
        let mut json = String::from(if envelope { r#"{"c":{"callStats":"# } else { r#"{"c":"# });
        for i in 0..depth {
            json.push_str(&format!(r#"{{"stack":["f{i}"],"sampleCount":1,"children":["#));
        }
        for _ in 0..depth {
            json.push_str("]}");
        }
        if envelope {
            json.push_str(r#","runTime":1}"#);
        }
        json.push('}');
        json
    }

    #[test]
    fn accepts_deep_trees() {
        let snapshot = parse(&nested_profile(100, false)).expect("valid profile");
        assert_eq!(snapshot.and_then(|s| s.root().map(CallNode::depth_count)), Some(100));
    }

    #[test]
    fn depth_limit_admits_both_body_shapes() {
        for envelope in [false, true] {
            let json = nested_profile(MAX_CALL_DEPTH, envelope);
            assert!(!exceeds_nesting(json.as_bytes(), MAX_JSON_NESTING));
            let json = nested_profile(MAX_CALL_DEPTH + 1, envelope);
            assert!(exceeds_nesting(json.as_bytes(), MAX_JSON_NESTING));
        }
    }

    #[test]
    fn rejects_pathologically_deep_trees() {
        for depth in [MAX_CALL_DEPTH + 1, 10_000] {
            match parse(&nested_profile(depth, false)) {
                Err(ProfileError::TooDeep { limit }) => assert_eq!(limit, MAX_CALL_DEPTH),
                other => panic!("depth {depth}: unexpected {other:?}"),
            }
        }
        assert!(matches!(
            parse(&nested_profile(10_000, true)),
            Err(ProfileError::TooDeep { .. })
        ));
    }

    #[test]
    fn brackets_inside_labels_do_not_count() {
        let label = "[".repeat(MAX_JSON_NESTING + 1);
        let json = format!(r#"{{"c":{{"stack":["{label}\\\"{{"],"sampleCount":1}}}}"#);
        let snapshot = parse(&json).expect("valid profile");
        assert!(snapshot.is_some_and(|s| s.has_samples()));
    }
}
