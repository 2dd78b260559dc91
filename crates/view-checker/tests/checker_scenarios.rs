use std::borrow::Cow;
use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;
use view_checker::{
    CheckerConfig, IdentifierChecker, Interval, ManualScheduler, Scheduler, TokioScheduler,
    ViewClass, ViewNode,
};

#[derive(Debug)]
struct Widget {
    name: String,
    lineage: Vec<ViewClass>,
    identifier: Option<String>,
    children: Mutex<Vec<Arc<Widget>>>,
}

impl Widget {
    fn new(name: &str, lineage: &[&str], identifier: Option<&str>) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            lineage: lineage.iter().map(|c| ViewClass::new(*c).unwrap()).collect(),
            identifier: identifier.map(str::to_string),
            children: Mutex::new(Vec::new()),
        })
    }

    fn button(name: &str) -> Arc<Self> {
        Self::new(name, &["Button", "Control", "View"], None)
    }

    fn view(name: &str, children: &[&Arc<Widget>]) -> Arc<Self> {
        let view = Self::new(name, &["View"], None);
        view.children
            .lock()
            .extend(children.iter().map(|child| Arc::clone(child)));
        view
    }
}

impl ViewNode for Widget {
    fn identifier(&self) -> Option<Cow<'_, str>> {
        self.identifier.as_deref().map(Cow::Borrowed)
    }

    fn children(&self) -> Vec<Arc<Self>> {
        self.children.lock().clone()
    }

    fn lineage(&self) -> &[ViewClass] {
        &self.lineage
    }
}

type RootSlot = Arc<Mutex<Option<Arc<Widget>>>>;
type Reports = Arc<Mutex<Vec<String>>>;

struct Harness {
    checker: Arc<IdentifierChecker<Widget>>,
    scheduler: Arc<ManualScheduler>,
    reports: Reports,
    root: RootSlot,
}

fn harness(config: CheckerConfig, root: Option<Arc<Widget>>) -> Harness {
    let scheduler = Arc::new(ManualScheduler::new());
    let reports: Reports = Arc::new(Mutex::new(Vec::new()));
    let slot: RootSlot = Arc::new(Mutex::new(root));

    let provider_slot = Arc::clone(&slot);
    let sink_reports = Arc::clone(&reports);
    let checker = IdentifierChecker::builder(config)
        .root_provider(move || provider_slot.lock().clone())
        .report_sink(move |node: &Arc<Widget>| sink_reports.lock().push(node.name.clone()))
        .scheduler(Arc::clone(&scheduler) as Arc<dyn Scheduler>)
        .build()
        .expect("checker builds");

    Harness {
        checker,
        scheduler,
        reports,
        root: slot,
    }
}

#[test]
fn nothing_is_reported_before_the_first_fire() {
    let h = harness(CheckerConfig::default(), Some(Widget::button("lonely")));

    h.checker.start();

    assert!(h.reports.lock().is_empty());
}

#[test]
fn one_pass_reports_buttons_at_any_depth() {
    let button_a = Widget::button("ButtonA");
    let button_b = Widget::button("ButtonB");
    let plain = Widget::view("PlainView", &[&button_b]);
    let root = Widget::view("root", &[&button_a, &plain]);
    let h = harness(CheckerConfig::default(), Some(root));

    h.checker.start();
    h.scheduler.fire();

    assert_eq!(*h.reports.lock(), vec!["ButtonA", "ButtonB"]);
}

#[test]
fn repeated_fires_report_each_node_once() {
    let button = Widget::button("only");
    let h = harness(CheckerConfig::default(), Some(Arc::clone(&button)));

    h.checker.start();
    assert_eq!(h.scheduler.fire_times(3), 3);

    assert_eq!(*h.reports.lock(), vec!["only"]);
    assert_eq!(h.checker.stats().passes, 3);
}

#[test]
fn schedule_uses_zero_then_interval() {
    let config = CheckerConfig::default().with_interval(Interval::from_secs_f64(5.0).unwrap());
    let h = harness(config, Some(Widget::button("b")));

    h.checker.start();
    assert_eq!(h.scheduler.last_delay(), Some(Duration::ZERO));

    h.scheduler.fire();
    assert_eq!(h.scheduler.last_delay(), Some(Duration::from_secs_f64(5.0)));
    assert_eq!(h.scheduler.delays().len(), 2);
}

#[test]
fn absent_root_keeps_the_loop_alive() {
    let h = harness(CheckerConfig::default(), None);

    h.checker.start();
    h.scheduler.fire();
    assert!(h.scheduler.has_pending());
    assert!(h.reports.lock().is_empty());

    *h.root.lock() = Some(Widget::button("late"));
    h.scheduler.fire();

    assert_eq!(*h.reports.lock(), vec!["late"]);
    assert_eq!(h.checker.stats().empty_passes, 1);
}

#[test]
fn checker_does_not_keep_nodes_alive() {
    let button = Widget::button("transient");
    let probe: Weak<Widget> = Arc::downgrade(&button);
    let h = harness(
        CheckerConfig::default(),
        Some(Widget::view("root", &[&button])),
    );
    drop(button);

    h.checker.start();
    h.scheduler.fire();
    assert_eq!(*h.reports.lock(), vec!["transient"]);
    assert!(probe.upgrade().is_some());

    *h.root.lock() = None;
    assert!(probe.upgrade().is_none());

    h.scheduler.fire();
    assert!(probe.upgrade().is_none());
    assert_eq!(h.checker.purge_released(), 1);
}

#[test]
fn custom_classes_are_reported_when_unidentified() {
    let config = CheckerConfig::default().with_custom_checkable([ViewClass::new("ChartView").unwrap()]);
    let chart = Widget::new("chart", &["ChartView", "View"], None);
    let labelled = Widget::new("labelled", &["ChartView", "View"], Some("dashboard.chart"));
    let h = harness(config, Some(Widget::view("root", &[&chart, &labelled])));

    h.checker.start();
    h.scheduler.fire();

    assert_eq!(*h.reports.lock(), vec!["chart"]);
}

#[test]
fn empty_identifier_is_reported() {
    let blank = Widget::new("blank", &["TextField", "Control", "View"], Some(""));
    let h = harness(CheckerConfig::default(), Some(blank));

    h.checker.start();
    h.scheduler.fire();

    assert_eq!(*h.reports.lock(), vec!["blank"]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn runs_on_tokio_until_stopped() {
    let reports: Reports = Arc::new(Mutex::new(Vec::new()));
    let root = Widget::view("root", &[&Widget::button("tokio")]);
    let sink_reports = Arc::clone(&reports);
    let config =
        CheckerConfig::default().with_interval(Interval::new(Duration::from_millis(10)).unwrap());

    let checker = IdentifierChecker::builder(config)
        .root_provider(move || Some(Arc::clone(&root)))
        .report_sink(move |node: &Arc<Widget>| sink_reports.lock().push(node.name.clone()))
        .scheduler(Arc::new(TokioScheduler::current().unwrap()))
        .build()
        .unwrap();

    checker.start();
    tokio::time::sleep(Duration::from_millis(100)).await;
    checker.stop();

    let passes = checker.stats().passes;
    assert!(passes >= 2, "expected several passes, got {passes}");
    assert_eq!(*reports.lock(), vec!["tokio"]);

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(checker.stats().passes <= passes + 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn started_checker_keeps_running_without_a_handle() {
    let reports: Reports = Arc::new(Mutex::new(Vec::new()));
    let root = Widget::view("root", &[&Widget::button("unowned")]);
    let sink_reports = Arc::clone(&reports);
    let config =
        CheckerConfig::default().with_interval(Interval::new(Duration::from_millis(10)).unwrap());

    {
        let checker = IdentifierChecker::builder(config)
            .root_provider(move || Some(Arc::clone(&root)))
            .report_sink(move |node: &Arc<Widget>| sink_reports.lock().push(node.name.clone()))
            .scheduler(Arc::new(TokioScheduler::current().unwrap()))
            .build()
            .unwrap();
        checker.start();
    }

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(*reports.lock(), vec!["unowned"]);
}
