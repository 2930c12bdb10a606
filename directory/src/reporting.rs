//! Reporting-structure hydration.
//!
//! Given a root employee id, walks the direct-report graph, replaces each
//! id-only placeholder with its fully hydrated subtree and totals the
//! transitive report count. The report graph is assumed acyclic: a cycle is
//! re-fetched forever until resources run out, and an employee reachable
//! through two managers is hydrated once per path. Both are accepted
//! limitations of the reference behavior.

use std::collections::VecDeque;
use std::sync::Arc;

use tracing::debug;

use crate::error::DirectoryError;
use crate::model::{Employee, ReportingStructure};
use crate::store::EmployeeStore;

pub struct ReportingStructureBuilder {
    store: Arc<dyn EmployeeStore>,
}

/// One partially hydrated employee on the traversal stack.
struct Frame {
    employee: Employee,
    pending: VecDeque<String>,
    hydrated: Vec<Employee>,
    reports: u32,
}

impl Frame {
    fn new(mut employee: Employee) -> Self {
        let pending: VecDeque<String> = employee
            .direct_reports
            .drain(..)
            .map(|placeholder| placeholder.employee_id)
            .collect();
        let hydrated = Vec::with_capacity(pending.len());
        Self {
            employee,
            pending,
            hydrated,
            reports: 0,
        }
    }

    fn finish(mut self) -> (Employee, u32) {
        self.employee.direct_reports = self.hydrated;
        (self.employee, self.reports)
    }
}

impl ReportingStructureBuilder {
    pub fn new(store: Arc<dyn EmployeeStore>) -> Self {
        Self { store }
    }

    /// Hydrate the full subtree under `root_id`.
    ///
    /// Post-order traversal over an explicit stack, so arbitrarily deep
    /// chains cost heap rather than call stack. One store read per node;
    /// the store is never written. Fails with `NotFound` for a missing
    /// root, and equally for a dangling report id met mid-walk — a partial
    /// tree is never returned.
    pub async fn build(&self, root_id: &str) -> Result<ReportingStructure, DirectoryError> {
        debug!(%root_id, "building reporting structure");
        let root = self.fetch(root_id).await?;
        let mut stack = vec![Frame::new(root)];
        loop {
            let next = match stack.last_mut() {
                Some(frame) => frame.pending.pop_front(),
                None => break,
            };
            if let Some(id) = next {
                // Replace the placeholder with the stored record; its own
                // reports are still placeholders and go on the stack next.
                let report = self.fetch(&id).await?;
                stack.push(Frame::new(report));
                continue;
            }
            let Some(done) = stack.pop() else { break };
            let (employee, reports) = done.finish();
            match stack.last_mut() {
                Some(parent) => {
                    // The 1 counts the direct report itself.
                    parent.reports += 1 + reports;
                    parent.hydrated.push(employee);
                }
                None => {
                    debug!(%root_id, number_of_reports = reports, "reporting structure complete");
                    return Ok(ReportingStructure {
                        employee,
                        number_of_reports: reports,
                    });
                }
            }
        }
        unreachable!("popping the root frame returns from the loop")
    }

    async fn fetch(&self, id: &str) -> Result<Employee, DirectoryError> {
        self.store
            .read(id)
            .await?
            .ok_or_else(|| DirectoryError::NotFound(id.to_owned()))
    }
}
