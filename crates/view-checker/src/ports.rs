use std::fmt;
use std::sync::Arc;

use idcheck_core_types::ViewNode;
use tracing::warn;

/// Supplies the current tree root, once per pass.
pub trait RootProvider<N>: Send + Sync {
    fn root(&self) -> Option<Arc<N>>;
}

impl<N, F> RootProvider<N> for F
where
    F: Fn() -> Option<Arc<N>> + Send + Sync,
{
    fn root(&self) -> Option<Arc<N>> {
        self()
    }
}

/// Receives each checkable node that lacks an identifier, once per node.
///
/// Called while the checker holds its pass lock: a sink must not call back
/// into the checker that invoked it.
pub trait ReportSink<N>: Send + Sync {
    fn report(&self, node: &Arc<N>);
}

impl<N, F> ReportSink<N> for F
where
    F: Fn(&Arc<N>) + Send + Sync,
{
    fn report(&self, node: &Arc<N>) {
        self(node)
    }
}

/// Default sink: one `warn!` event per offending node.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl<N> ReportSink<N> for TracingSink
where
    N: ViewNode + fmt::Debug,
{
    fn report(&self, node: &Arc<N>) {
        let class = node
            .lineage()
            .first()
            .map(|class| class.as_str())
            .unwrap_or("<unknown>");
        warn!(target: "idcheck", class, node = ?node, "missing accessibility identifier");
    }
}
