/// Execute an aggregate command deterministically (no IO, no async).
///
/// 1. **Decide**: `aggregate.handle(command)` produces events without mutating.
/// 2. **Evolve**: each event is applied in order.
///
/// If the decision fails nothing is applied, so the aggregate is left
/// untouched. The returned events describe exactly what changed.
pub fn execute<A>(aggregate: &mut A, command: &A::Command) -> Result<Vec<A::Event>, A::Error>
where
    A: vendomat_core::Aggregate,
{
    let events = A::handle(aggregate, command)?;
    for ev in &events {
        A::apply(aggregate, ev);
    }
    Ok(events)
}
