//! Script command registry: the `APIClient` type exposed to scripts.
//!
//! Every method runs one automation command and converts the result into a
//! script value. Failures never raise into the interpreter: they come back as
//! a single `"error: ..."` string so scripts can branch on them.
//!
//! | Method | Returns |
//! |---|---|
//! | `mousemove(x, y)`, `click(x, y)` | `"<Op> Point: X=.., Y=.."` |
//! | `movewheel(amt)`, `sendtext(x, y, text)`, `type(text)` | `"<Op> Point: Data={..}"` |
//! | `findtext(text)`, `findimage(img)`, `getmouse()` | `[x, y]` |
//! | `gettext(x, y, w, h)` | recognized text |
//! | `screenshot()` | base64 image |
//! | `getmousecolor(x, y)` | `[r, g, b]` |

use rhai::{Array, Dynamic, Engine, ImmutableString, INT};
use tokio::runtime::Handle;

use crate::automation::{AutomationClient, AutomationCommand, AutomationResult, Point};

/// Name of the handle type and its constructor in scripts.
pub const HANDLE_TYPE_NAME: &str = "APIClient";

/// Script-side automation handle bound to one base URL.
///
/// Calls block the script thread on the runtime until the service answers.
#[derive(Debug, Clone)]
pub struct AutomationHandle {
    client: AutomationClient,
    runtime: Handle,
}

impl AutomationHandle {
    pub fn new(base_url: impl Into<String>, runtime: Handle) -> Self {
        Self {
            client: AutomationClient::new(base_url),
            runtime,
        }
    }

    pub fn base_url(&self) -> &str {
        self.client.base_url()
    }

    fn run(&self, command: AutomationCommand) -> AutomationResult<Point> {
        let result = self.runtime.block_on(self.client.execute(&command));
        if let Err(e) = &result {
            tracing::warn!(
                endpoint = command.endpoint(),
                error = %e,
                "Automation command failed"
            );
        }
        result
    }

    /// Run `command` and shape the result with `f`, turning any error into a string value.
    fn dispatch<F>(&self, command: AutomationCommand, f: F) -> Dynamic
    where
        F: FnOnce(Point) -> AutomationResult<Dynamic>,
    {
        match self.run(command).and_then(f) {
            Ok(value) => value,
            Err(e) => error_value(e),
        }
    }

    fn point_summary(&self, label: &str, command: AutomationCommand) -> Dynamic {
        self.dispatch(command, |p| {
            let (x, y) = p.coords();
            Ok(format!("{} Point: X={}, Y={}", label, x, y).into())
        })
    }

    fn data_summary(&self, label: &str, command: AutomationCommand) -> Dynamic {
        self.dispatch(command, |p| {
            Ok(format!("{} Point: Data={}", label, p.data_string()).into())
        })
    }

    fn coordinates(&self, command: AutomationCommand) -> Dynamic {
        self.dispatch(command, |p| {
            let (x, y) = p.coords();
            Ok(int_array([x, y]))
        })
    }

    pub fn mousemove(&mut self, x: INT, y: INT) -> Dynamic {
        self.point_summary("MouseMove", AutomationCommand::MouseMove { x, y })
    }

    pub fn click(&mut self, x: INT, y: INT) -> Dynamic {
        self.point_summary("Click", AutomationCommand::Click { x, y })
    }

    pub fn movewheel(&mut self, amt: INT) -> Dynamic {
        self.data_summary("MoveWheel", AutomationCommand::MoveWheel { amt })
    }

    pub fn sendtext(&mut self, x: INT, y: INT, text: ImmutableString) -> Dynamic {
        self.data_summary(
            "SendText",
            AutomationCommand::SendText {
                x,
                y,
                text: text.to_string(),
            },
        )
    }

    pub fn type_text(&mut self, text: ImmutableString) -> Dynamic {
        self.data_summary(
            "Type",
            AutomationCommand::Type {
                text: text.to_string(),
            },
        )
    }

    pub fn findtext(&mut self, text: ImmutableString) -> Dynamic {
        self.coordinates(AutomationCommand::FindText {
            text: text.to_string(),
        })
    }

    pub fn gettext(&mut self, x: INT, y: INT, w: INT, h: INT) -> Dynamic {
        self.dispatch(AutomationCommand::GetText { x, y, w, h }, |p| {
            Ok(p.text()?.to_string().into())
        })
    }

    pub fn findimage(&mut self, img: ImmutableString) -> Dynamic {
        self.coordinates(AutomationCommand::FindImage {
            img: img.to_string(),
        })
    }

    pub fn screenshot(&mut self) -> Dynamic {
        self.dispatch(AutomationCommand::Screenshot, |p| {
            Ok(p.string("img")?.to_string().into())
        })
    }

    pub fn getmousecolor(&mut self, x: INT, y: INT) -> Dynamic {
        self.dispatch(AutomationCommand::GetMouseColor { x, y }, |p| {
            Ok(int_array([
                p.channel("rgb_r")?,
                p.channel("rgb_g")?,
                p.channel("rgb_b")?,
            ]))
        })
    }

    pub fn getmouse(&mut self) -> Dynamic {
        self.coordinates(AutomationCommand::GetMouse)
    }
}

fn error_value(e: impl std::fmt::Display) -> Dynamic {
    format!("error: {}", e).into()
}

fn int_array<const N: usize>(values: [i64; N]) -> Dynamic {
    let array: Array = values.into_iter().map(Dynamic::from_int).collect();
    Dynamic::from_array(array)
}

/// Register the `APIClient` type, its constructor and its eleven methods.
pub fn register_automation(engine: &mut Engine, runtime: Handle) {
    engine.register_type_with_name::<AutomationHandle>(HANDLE_TYPE_NAME);
    engine.register_fn(HANDLE_TYPE_NAME, move |base_url: ImmutableString| {
        AutomationHandle::new(base_url.to_string(), runtime.clone())
    });
    engine.register_get("base_url", |h: &mut AutomationHandle| -> ImmutableString {
        h.base_url().into()
    });

    engine
        .register_fn("mousemove", AutomationHandle::mousemove)
        .register_fn("click", AutomationHandle::click)
        .register_fn("movewheel", AutomationHandle::movewheel)
        .register_fn("sendtext", AutomationHandle::sendtext)
        .register_fn("type", AutomationHandle::type_text)
        .register_fn("findtext", AutomationHandle::findtext)
        .register_fn("gettext", AutomationHandle::gettext)
        .register_fn("findimage", AutomationHandle::findimage)
        .register_fn("screenshot", AutomationHandle::screenshot)
        .register_fn("getmousecolor", AutomationHandle::getmousecolor)
        .register_fn("getmouse", AutomationHandle::getmouse);
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Mock, Server, ServerGuard};
    use serde_json::json;
    use tokio::runtime::Runtime;

    struct Fixture {
        server: ServerGuard,
        runtime: Runtime,
        mocks: Vec<Mock>,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                server: Server::new(),
                runtime: Runtime::new().unwrap(),
                mocks: Vec::new(),
            }
        }

        fn stub(&mut self, path: &str, body: &str) {
            let mock = self
                .server
                .mock("POST", path)
                .with_status(200)
                .with_body(body)
                .create();
            self.mocks.push(mock);
        }

        fn handle(&self) -> AutomationHandle {
            AutomationHandle::new(self.server.url(), self.runtime.handle().clone())
        }
    }

    fn as_string(value: Dynamic) -> String {
        value.try_cast::<String>().expect("string value")
    }

    fn as_ints(value: Dynamic) -> Vec<i64> {
        value
            .into_array()
            .expect("array value")
            .into_iter()
            .map(|v| v.as_int().expect("integer element"))
            .collect()
    }

    #[test]
    fn click_formats_point() {
        let mut fx = Fixture::new();
        let mock = fx
            .server
            .mock("POST", "/click")
            .match_body(Matcher::PartialJson(json!({"data": {"x": 100, "y": 200}})))
            .with_body(r#"{"x": 100, "y": 200}"#)
            .create();

        let out = fx.handle().click(100, 200);
        assert_eq!(as_string(out), "Click Point: X=100, Y=200");
        mock.assert();
    }

    #[test]
    fn mousemove_formats_point() {
        let mut fx = Fixture::new();
        fx.stub("/mousemove", r#"{"x": 5, "y": 6}"#);

        assert_eq!(as_string(fx.handle().mousemove(5, 6)), "MouseMove Point: X=5, Y=6");
    }

    #[test]
    fn data_operations_format_raw_map() {
        let mut fx = Fixture::new();
        fx.stub("/movewheel", r#"{"data": {"amt": 3}}"#);
        fx.stub("/sendtext", r#"{"data": {"sent": "hi"}}"#);
        fx.stub("/type", r#"{"data": {}}"#);

        let mut handle = fx.handle();
        assert_eq!(as_string(handle.movewheel(3)), r#"MoveWheel Point: Data={"amt":3}"#);
        assert_eq!(
            as_string(handle.sendtext(1, 2, "hi".into())),
            r#"SendText Point: Data={"sent":"hi"}"#
        );
        assert_eq!(as_string(handle.type_text("x".into())), "Type Point: Data={}");
    }

    #[test]
    fn findtext_returns_coordinates() {
        let mut fx = Fixture::new();
        let mock = fx
            .server
            .mock("POST", "/findtext")
            .match_body(Matcher::PartialJson(json!({"data": {"text": "OK"}})))
            .with_body(r#"{"x": 12, "y": 34}"#)
            .create();

        assert_eq!(as_ints(fx.handle().findtext("OK".into())), vec![12, 34]);
        mock.assert();
    }

    #[test]
    fn findimage_and_getmouse_return_coordinates() {
        let mut fx = Fixture::new();
        fx.stub("/findimage", r#"{"x": 7, "y": 8}"#);
        fx.stub("/getmouse", r#"{"y": 9}"#);

        let mut handle = fx.handle();
        assert_eq!(as_ints(handle.findimage("ok.png".into())), vec![7, 8]);
        assert_eq!(as_ints(handle.getmouse()), vec![0, 9]);
    }

    #[test]
    fn gettext_and_screenshot_return_strings() {
        let mut fx = Fixture::new();
        fx.stub("/gettext", r#"{"data": {"text": "Submit"}}"#);
        fx.stub("/screenshot", r#"{"data": {"img": "iVBORw0KGgo="}}"#);

        let mut handle = fx.handle();
        assert_eq!(as_string(handle.gettext(0, 0, 50, 20)), "Submit");
        assert_eq!(as_string(handle.screenshot()), "iVBORw0KGgo=");
    }

    #[test]
    fn getmousecolor_returns_channels() {
        let mut fx = Fixture::new();
        fx.stub(
            "/getmousecolor",
            r#"{"data": {"rgb_r": 255, "rgb_g": 0, "rgb_b": 0}}"#,
        );

        assert_eq!(as_ints(fx.handle().getmousecolor(5, 5)), vec![255, 0, 0]);
    }

    #[test]
    fn http_errors_become_error_strings() {
        let mut fx = Fixture::new();
        for path in [
            "/mousemove", "/click", "/movewheel", "/sendtext", "/type", "/findtext",
            "/gettext", "/findimage", "/screenshot", "/getmousecolor", "/getmouse",
        ] {
            let mock = fx.server.mock("POST", path).with_status(500).create();
            fx.mocks.push(mock);
        }

        let mut h = fx.handle();
        let results = [
            h.mousemove(1, 1),
            h.click(1, 1),
            h.movewheel(1),
            h.sendtext(1, 1, "a".into()),
            h.type_text("a".into()),
            h.findtext("a".into()),
            h.gettext(1, 1, 1, 1),
            h.findimage("a".into()),
            h.screenshot(),
            h.getmousecolor(1, 1),
            h.getmouse(),
        ];
        for value in results {
            let text = as_string(value);
            assert!(text.starts_with("error: "), "unexpected: {}", text);
        }
    }

    #[test]
    fn malformed_json_becomes_error_string() {
        let mut fx = Fixture::new();
        fx.stub("/findtext", "<html>oops</html>");
        fx.stub("/getmousecolor", "{");

        let mut h = fx.handle();
        assert!(as_string(h.findtext("a".into())).starts_with("error: error decoding JSON response"));
        assert!(as_string(h.getmousecolor(0, 0)).starts_with("error: "));
    }

    #[test]
    fn missing_or_mistyped_data_keys_become_error_strings() {
        let mut fx = Fixture::new();
        fx.stub("/gettext", r#"{"data": {}}"#);
        fx.stub("/screenshot", r#"{"data": {"img": 42}}"#);
        fx.stub("/getmousecolor", r#"{"data": {"rgb_r": 1, "rgb_g": "x", "rgb_b": 0}}"#);

        let mut h = fx.handle();
        assert!(as_string(h.gettext(0, 0, 1, 1)).contains("missing data key 'text'"));
        assert!(as_string(h.screenshot()).contains("expected string"));
        assert!(as_string(h.getmousecolor(0, 0)).contains("'rgb_g'"));
    }

    #[test]
    fn methods_are_callable_from_scripts() {
        let mut fx = Fixture::new();
        fx.stub("/findtext", r#"{"x": 12, "y": 34}"#);
        fx.stub("/click", r#"{"x": 12, "y": 34}"#);

        let mut engine = Engine::new();
        register_automation(&mut engine, fx.runtime.handle().clone());

        let script = format!(
            r#"
            let api = APIClient("{}");
            let pos = api.findtext("OK");
            api.click(pos[0], pos[1])
            "#,
            fx.server.url()
        );
        let out: String = engine.eval(&script).unwrap();
        assert_eq!(out, "Click Point: X=12, Y=34");
    }
}
