/// Module resolution and post-parse fix-ups.
impl<'a> Parser<'a> {
    // ========================================================================
    // Resolution
    // ========================================================================

    /// Resolve a module name through the index.
    ///
    /// Without an index nothing is resolved and nothing is reported.
    fn resolve_module(&mut self, name: &str, span: Span) -> Option<ModuleRef> {
        let index = self.index?;
        match index.find_module(name) {
            Some(summary) => Some(summary.to_ref()),
            None => {
                tracing::debug!(module = %name, "unresolved module");
                self.errors.push(errors::unresolved_module(name, span));
                None
            }
        }
    }

    /// Bind every `PERFORM` to an inline subroutine, or else to an external one from the index.
    fn resolve_performs(&mut self) {
        for (perform, name_span) in std::mem::take(&mut self.performs) {
            let NodeKind::Perform { name, .. } = self.tree.kind(perform) else {
                continue;
            };
            let name = name.clone();

            let target = if let Some(subroutine) = self.subroutines.get(&name) {
                PerformTarget::Internal(*subroutine)
            } else if let Some(summary) = self.index.and_then(|index| index.find_module(&name)) {
                PerformTarget::External(summary.to_ref())
            } else {
                if self.index.is_some() {
                    tracing::debug!(subroutine = %name, "unresolved PERFORM");
                    self.errors.push(errors::unresolved_subroutine(&name, name_span));
                }
                PerformTarget::Unresolved
            };

            if let NodeKind::Perform { target: slot, .. } = self.tree.kind_mut(perform) {
                *slot = target;
            }
        }
    }
}
