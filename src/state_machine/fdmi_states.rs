// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Management Server registration flow. The fabric learns about the HBA
//! through RHBA/RPA (physical port) or RPRT (NPIV port), and older fabrics
//! only accept the older attribute catalogs, so registration walks a table
//! of catalog rounds instead of giving up on the first reject:
//!
//! ```text
//!   EnsureLogin -> RegisterHba[Fdmi2] -> RegisterPortAttrs[SmartSan?,Fdmi2]
//!                       |  already registered: DHBA, retry    |
//!                       v  any failure                        v  exhausted
//!                  RegisterHba[Fdmi1] -> RegisterPortAttrs[Fdmi1]
//!
//!   EnsureLogin -> RegisterPort[SmartSan?,Fdmi2,Fdmi1]   (NPIV, first
//!                                                         success wins)
//! ```

use std::pin::Pin;

use tracing::debug;

use crate::{
    fabric::{adapter::Adapter, channel::CommandChannel, error::GsError},
    handlers::fdmi::{dhba, rhba, rpa, rprt},
    models::fdmi::AttrSet,
    state_machine::common::{StateMachine, StateMachineCtx, Transition},
};

/// HBA catalog tried per round, newest first.
const HBA_ROUNDS: [AttrSet; 2] = [AttrSet::Fdmi2, AttrSet::Fdmi1];

fn rprt_sets(smart_san: bool) -> &'static [AttrSet] {
    if smart_san {
        &[AttrSet::SmartSan, AttrSet::Fdmi2, AttrSet::Fdmi1]
    } else {
        &[AttrSet::Fdmi2, AttrSet::Fdmi1]
    }
}

fn rpa_sets(round: usize, smart_san: bool) -> &'static [AttrSet] {
    match (round, smart_san) {
        (0, true) => &[AttrSet::SmartSan, AttrSet::Fdmi2],
        (0, false) => &[AttrSet::Fdmi2],
        _ => &[AttrSet::Fdmi1],
    }
}

pub struct FdmiCtx<'a, C: CommandChannel> {
    pub adapter: &'a mut Adapter<C>,

    state: Option<FdmiStates>,
}

impl<'a, C: CommandChannel> FdmiCtx<'a, C> {
    pub fn new(adapter: &'a mut Adapter<C>) -> Self {
        Self {
            adapter,
            state: Some(FdmiStates::EnsureLogin(EnsureLogin)),
        }
    }

    /// RHBA with the already-registered recovery: a stale record from an
    /// earlier driver instance is deregistered and the RHBA retried once.
    async fn register_hba(&mut self, set: AttrSet) -> Result<(), GsError> {
        match rhba(self.adapter, set).await {
            Err(e) if e.is_already_registered() => {
                debug!(?set, "HBA already registered, clearing the stale record");
                dhba(self.adapter).await?;
                rhba(self.adapter, set).await
            },
            other => other,
        }
    }
}

#[derive(Debug)]
pub struct EnsureLogin;
#[derive(Debug)]
pub struct RegisterPort {
    sets: &'static [AttrSet],
}
#[derive(Debug)]
pub struct RegisterHba {
    round: usize,
}
#[derive(Debug)]
pub struct RegisterPortAttrs {
    round: usize,
    sets: &'static [AttrSet],
}

#[derive(Debug)]
pub enum FdmiStates {
    EnsureLogin(EnsureLogin),
    RegisterPort(RegisterPort),
    RegisterHba(RegisterHba),
    RegisterPortAttrs(RegisterPortAttrs),
}

type FdmiStepOut = Transition<FdmiStates, Result<(), GsError>>;

impl<'ctx, C: CommandChannel> StateMachine<FdmiCtx<'ctx, C>, FdmiStepOut> for EnsureLogin {
    type StepResult<'a>
        = Pin<Box<dyn Future<Output = FdmiStepOut> + Send + 'a>>
    where
        Self: 'a,
        FdmiCtx<'ctx, C>: 'a;

    fn step<'a>(&'a self, ctx: &'a mut FdmiCtx<'ctx, C>) -> Self::StepResult<'a> {
        Box::pin(async move {
            if let Err(e) = ctx.adapter.management_login().await {
                return Transition::Done(Err(e));
            }
            let next = if ctx.adapter.is_npiv() {
                FdmiStates::RegisterPort(RegisterPort {
                    sets: rprt_sets(ctx.adapter.smart_san_enabled()),
                })
            } else {
                FdmiStates::RegisterHba(RegisterHba { round: 0 })
            };
            Transition::Next(next, Ok(()))
        })
    }
}

impl<'ctx, C: CommandChannel> StateMachine<FdmiCtx<'ctx, C>, FdmiStepOut> for RegisterPort {
    type StepResult<'a>
        = Pin<Box<dyn Future<Output = FdmiStepOut> + Send + 'a>>
    where
        Self: 'a,
        FdmiCtx<'ctx, C>: 'a;

    fn step<'a>(&'a self, ctx: &'a mut FdmiCtx<'ctx, C>) -> Self::StepResult<'a> {
        Box::pin(async move {
            let (set, rest) = match self.sets.split_first() {
                Some((set, rest)) => (*set, rest),
                None => {
                    return Transition::Done(Err(GsError::Internal("empty RPRT catalog chain")));
                },
            };
            match rprt(ctx.adapter, set).await {
                Ok(()) => Transition::Done(Ok(())),
                Err(e) if !rest.is_empty() => {
                    debug!(?set, error = %e, "RPRT failed, trying the next catalog");
                    Transition::Next(
                        FdmiStates::RegisterPort(RegisterPort { sets: rest }),
                        Ok(()),
                    )
                },
                Err(e) => Transition::Done(Err(e)),
            }
        })
    }
}

impl<'ctx, C: CommandChannel> StateMachine<FdmiCtx<'ctx, C>, FdmiStepOut> for RegisterHba {
    type StepResult<'a>
        = Pin<Box<dyn Future<Output = FdmiStepOut> + Send + 'a>>
    where
        Self: 'a,
        FdmiCtx<'ctx, C>: 'a;

    fn step<'a>(&'a self, ctx: &'a mut FdmiCtx<'ctx, C>) -> Self::StepResult<'a> {
        Box::pin(async move {
            let set = match HBA_ROUNDS.get(self.round) {
                Some(set) => *set,
                None => {
                    return Transition::Done(Err(GsError::Internal("HBA round out of range")));
                },
            };
            match ctx.register_hba(set).await {
                Ok(()) => Transition::Next(
                    FdmiStates::RegisterPortAttrs(RegisterPortAttrs {
                        round: self.round,
                        sets: rpa_sets(self.round, ctx.adapter.smart_san_enabled()),
                    }),
                    Ok(()),
                ),
                Err(e) if self.round + 1 < HBA_ROUNDS.len() => {
                    debug!(?set, error = %e, "RHBA failed, falling back to the base round");
                    Transition::Next(
                        FdmiStates::RegisterHba(RegisterHba {
                            round: self.round + 1,
                        }),
                        Ok(()),
                    )
                },
                Err(e) => Transition::Done(Err(e)),
            }
        })
    }
}

impl<'ctx, C: CommandChannel> StateMachine<FdmiCtx<'ctx, C>, FdmiStepOut> for RegisterPortAttrs {
    type StepResult<'a>
        = Pin<Box<dyn Future<Output = FdmiStepOut> + Send + 'a>>
    where
        Self: 'a,
        FdmiCtx<'ctx, C>: 'a;

    fn step<'a>(&'a self, ctx: &'a mut FdmiCtx<'ctx, C>) -> Self::StepResult<'a> {
        Box::pin(async move {
            let (set, rest) = match self.sets.split_first() {
                Some((set, rest)) => (*set, rest),
                None => {
                    return Transition::Done(Err(GsError::Internal("empty RPA catalog chain")));
                },
            };
            match rpa(ctx.adapter, set).await {
                Ok(()) => Transition::Done(Ok(())),
                Err(e) if !rest.is_empty() => {
                    debug!(?set, error = %e, "RPA failed, trying the next catalog");
                    Transition::Next(
                        FdmiStates::RegisterPortAttrs(RegisterPortAttrs {
                            round: self.round,
                            sets: rest,
                        }),
                        Ok(()),
                    )
                },
                Err(e) if self.round + 1 < HBA_ROUNDS.len() => {
                    debug!(?set, error = %e, "RPA failed, falling back to the base round");
                    Transition::Next(
                        FdmiStates::RegisterHba(RegisterHba {
                            round: self.round + 1,
                        }),
                        Ok(()),
                    )
                },
                Err(e) => Transition::Done(Err(e)),
            }
        })
    }
}

impl<'ctx, C: CommandChannel> StateMachineCtx<FdmiCtx<'ctx, C>> for FdmiCtx<'ctx, C> {
    async fn execute(&mut self) -> Result<(), GsError> {
        if self.adapter.uses_send_sns() || self.adapter.embedded_management() {
            debug!("fabric management registration not applicable, reporting success");
            return Ok(());
        }
        debug!("Loop Fdmi");
        loop {
            let state = self
                .state
                .take()
                .ok_or(GsError::Internal("state must be set FdmiCtx"))?;
            let trans = match state {
                FdmiStates::EnsureLogin(s) => s.step(self).await,
                FdmiStates::RegisterPort(s) => s.step(self).await,
                FdmiStates::RegisterHba(s) => s.step(self).await,
                FdmiStates::RegisterPortAttrs(s) => s.step(self).await,
            };

            match trans {
                Transition::Next(next_state, r) => {
                    r?;
                    self.state = Some(next_state);
                },
                Transition::Stay(Ok(_)) => {},
                Transition::Stay(Err(e)) => return Err(e),
                Transition::Done(r) => return r,
            }
        }
    }
}

/// Convenience wrapper running the whole registration flow once.
pub async fn register_fdmi<C: CommandChannel>(adapter: &mut Adapter<C>) -> Result<(), GsError> {
    let mut ctx = FdmiCtx::new(adapter);
    ctx.execute().await
}
