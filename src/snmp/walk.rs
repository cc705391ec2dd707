// Lazy GetBulk walk of one subtree, fetched a page at a time as the consumer pulls.

use super::{Oid, SnmpError, SnmpTransport, Value, VarBind};
use futures_util::Stream;
use futures_util::stream;
use std::collections::VecDeque;

struct WalkState {
    base: Oid,
    /// Next OID to ask for; None once the subtree is exhausted.
    cursor: Option<Oid>,
    pending: VecDeque<VarBind>,
}

/// Streams every varbind under `base` in MIB order. Pages are requested only when the
/// consumer has drained the previous one, so dropping the stream early stops the walk.
/// Ends at the first OID outside `base`, at endOfMibView, or if the agent stops advancing.
pub fn bulk_walk<'a, T>(
    transport: &'a T,
    base: Oid,
    max_repetitions: u32,
) -> impl Stream<Item = Result<VarBind, SnmpError>> + 'a
where
    T: SnmpTransport + ?Sized,
{
    let state = WalkState {
        cursor: Some(base.clone()),
        base,
        pending: VecDeque::new(),
    };
    stream::try_unfold(state, move |state| {
        next_varbind(transport, max_repetitions, state)
    })
}

async fn next_varbind<T: SnmpTransport + ?Sized>(
    transport: &T,
    max_repetitions: u32,
    mut state: WalkState,
) -> Result<Option<(VarBind, WalkState)>, SnmpError> {
    loop {
        if let Some(vb) = state.pending.pop_front() {
            return Ok(Some((vb, state)));
        }
        let Some(cursor) = state.cursor.take() else {
            return Ok(None);
        };

        let response = transport
            .get_bulk(std::slice::from_ref(&cursor), 0, max_repetitions)
            .await?;
        response.check()?;
        tracing::trace!(%cursor, varbinds = response.varbinds.len(), "walk page");

        let mut last = cursor;
        let mut finished = response.varbinds.is_empty();
        for vb in response.varbinds {
            if vb.value == Value::EndOfMibView
                || !vb.oid.is_descendant_of(&state.base)
                || vb.oid <= last
            {
                finished = true;
                break;
            }
            last = vb.oid.clone();
            state.pending.push_back(vb);
        }
        if !finished {
            state.cursor = Some(last);
        }
    }
}
