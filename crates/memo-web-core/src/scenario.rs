//! Scripted page sessions over the in-memory DOM.
//!
//! A scenario is a JSON document listing the server-rendered elements and
//! the steps a visitor (and the swap engine) take:
//!
//! ```json
//! {
//!   "widgets": { "captcha_loaded": true },
//!   "elements": [
//!     { "id": "main-menu" },
//!     { "id": "main-menu-burger" }
//!   ],
//!   "steps": [
//!     { "type": "evaluate" },
//!     { "type": "loaded" },
//!     { "type": "click", "target": "main-menu-burger" },
//!     { "type": "swap", "status": 422, "container": "content", "rerun_scripts": true }
//!   ]
//! }
//! ```

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::config::ClientConfig;
use crate::dom::{Dom, Element, MemoryDom, Query};
use crate::error::{ClientError, ClientResult};
use crate::events::{DomEvent, EventKind};
use crate::features::login::CaptchaOutcome;
use crate::page::Page;
use crate::registry::FeatureKey;
use crate::swap::SwapDetail;
use crate::widgets::{CaptchaRender, LightboxOptions, RecordingCaptcha, RecordingLightbox, Widgets};

/// Which third-party libraries the simulated page has loaded
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WidgetSetup {
    pub captcha_loaded: bool,
    pub lightbox_available: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Step {
    /// Script tags run (initial load or re-injection)
    Evaluate,
    Click {
        target: String,
    },
    /// Type `value` into `target`, then release the key
    Keyup {
        target: String,
        #[serde(default)]
        value: Option<String>,
    },
    Submit {
        target: String,
    },
    Notify {
        event: String,
    },
    /// Fragment-loaded hooks fire
    Loaded,
    /// The CAPTCHA library finished loading
    CaptchaLoaded,
    /// A response arrives; swapped into `container` if the decision allows
    Swap {
        status: u16,
        #[serde(default)]
        container: Option<String>,
        #[serde(default)]
        elements: Vec<Element>,
        #[serde(default)]
        rerun_scripts: bool,
    },
}

impl Step {
    fn name(&self) -> &'static str {
        match self {
            Step::Evaluate => "evaluate",
            Step::Click { .. } => "click",
            Step::Keyup { .. } => "keyup",
            Step::Submit { .. } => "submit",
            Step::Notify { .. } => "notify",
            Step::Loaded => "loaded",
            Step::CaptchaLoaded => "captcha_loaded",
            Step::Swap { .. } => "swap",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Scenario {
    pub widgets: WidgetSetup,
    pub elements: Vec<Element>,
    pub steps: Vec<Step>,
}

impl Scenario {
    pub fn from_json_str(json: &str) -> ClientResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> ClientResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}

/// What one step did
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepReport {
    pub index: usize,
    pub step: &'static str,
    /// Listeners invoked, hooks fired, or features registered
    pub handled: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub swap: Option<SwapDetail>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub captcha: Option<CaptchaOutcome>,
}

impl StepReport {
    fn new(index: usize, step: &Step, handled: usize) -> Self {
        Self {
            index,
            step: step.name(),
            handled,
            swap: None,
            captcha: None,
        }
    }
}

/// Outcome of a replay
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplayReport {
    pub steps: Vec<StepReport>,
    pub registered: Vec<FeatureKey>,
    pub listeners: usize,
    pub captcha_renders: Vec<CaptchaRender>,
    pub lightbox_inits: Vec<LightboxOptions>,
    pub dom: MemoryDom,
}

/// Run `scenario` against a fresh page
pub fn replay(scenario: Scenario, config: ClientConfig) -> ClientResult<ReplayReport> {
    let captcha = Rc::new(RefCell::new(RecordingCaptcha {
        loaded: scenario.widgets.captcha_loaded,
        renders: Vec::new(),
    }));
    let lightbox = Rc::new(RefCell::new(RecordingLightbox {
        available: scenario.widgets.lightbox_available,
        inits: Vec::new(),
    }));
    let widgets = Widgets {
        captcha: captcha.clone(),
        lightbox: lightbox.clone(),
    };

    let dom = scenario
        .elements
        .into_iter()
        .fold(MemoryDom::new(), |dom, element| dom.with(element));
    let mut page = Page::new(dom, config).with_widgets(widgets);

    let mut steps = Vec::with_capacity(scenario.steps.len());
    for (index, step) in scenario.steps.into_iter().enumerate() {
        tracing::debug!(index, step = step.name(), "replaying step");
        let report = run_step(&mut page, index, step)?;
        steps.push(report);
    }

    let registered = page.registry().registered();
    let listeners = page.bus().listener_count();
    let captcha_renders = captcha.borrow().renders.clone();
    let lightbox_inits = lightbox.borrow().inits.clone();
    Ok(ReplayReport {
        steps,
        registered,
        listeners,
        captcha_renders,
        lightbox_inits,
        dom: page.dom().clone(),
    })
}

fn run_step(page: &mut Page, index: usize, step: Step) -> ClientResult<StepReport> {
    let report = match &step {
        Step::Evaluate => {
            let installed = page.evaluate_scripts();
            StepReport::new(index, &step, installed.len())
        }
        Step::Click { target } => {
            require(page, target)?;
            let handled = page.dispatch(&DomEvent::click(target.as_str()));
            StepReport::new(index, &step, handled)
        }
        Step::Keyup { target, value } => {
            require(page, target)?;
            if let Some(value) = value {
                page.dom_mut().set_value(Query::Id(target), value);
            }
            let handled = page.dispatch(&DomEvent::keyup(target.as_str()));
            StepReport::new(index, &step, handled)
        }
        Step::Submit { target } => {
            require(page, target)?;
            let handled = page.dispatch(&DomEvent::submit(target.as_str()));
            StepReport::new(index, &step, handled)
        }
        Step::Notify { event } => {
            let handled = page.dispatch(&DomEvent::new(EventKind::Notification(event.clone()), None));
            StepReport::new(index, &step, handled)
        }
        Step::Loaded => {
            let handled = page.fragment_loaded();
            StepReport::new(index, &step, handled)
        }
        Step::CaptchaLoaded => {
            let outcome = page.captcha_library_loaded()?;
            let mut report = StepReport::new(index, &step, usize::from(outcome == CaptchaOutcome::Rendered));
            report.captcha = Some(outcome);
            report
        }
        Step::Swap {
            status,
            container,
            elements,
            rerun_scripts,
        } => {
            let detail = page.before_swap(*status);
            let handled = match (detail.should_swap, container) {
                (true, Some(container)) => {
                    page.swap_fragment(container, elements.clone(), *rerun_scripts)?
                }
                (true, None) => {
                    if *rerun_scripts {
                        page.evaluate_scripts();
                    }
                    page.fragment_loaded()
                }
                (false, _) => 0,
            };
            let mut report = StepReport::new(index, &step, handled);
            report.swap = Some(detail);
            report
        }
    };
    Ok(report)
}

fn require(page: &Page, target: &str) -> ClientResult<()> {
    if page.dom().exists(Query::Id(target)) {
        Ok(())
    } else {
        Err(ClientError::UnknownElement(target.to_string()))
    }
}
