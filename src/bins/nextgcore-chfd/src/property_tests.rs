//! Property-based tests for the CHF context

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use proptest::prelude::*;

    use crate::config::ServiceConf;
    use crate::context::{ChfContext, ChfIdentity};
    use crate::error::ChfError;
    use crate::nf_service::api_version_in_uri;

    fn context() -> ChfContext {
        ChfContext::new(ChfIdentity::default(), 1024)
    }

    proptest! {
        #[test]
        fn prop_imsi_add_then_find(suffix in "[0-9]{0,15}") {
            let ctx = context();
            let supi = format!("imsi-{suffix}");
            let ue = ctx.ue_add(&supi).unwrap();
            let found = ctx.ue_find_by_supi(&supi).unwrap();
            prop_assert!(Arc::ptr_eq(&ue, &found));
            prop_assert_eq!(found.supi(), supi.as_str());
        }

        #[test]
        fn prop_non_imsi_rejected(supi in "\\PC{0,20}") {
            prop_assume!(!supi.starts_with("imsi-"));
            let ctx = context();
            prop_assert_eq!(
                ctx.ue_add(&supi).unwrap_err(),
                ChfError::InvalidIdentifier(supi.clone())
            );
            prop_assert!(ctx.ue_find_by_supi(&supi).is_none());
            prop_assert_eq!(ctx.ue_pool().count(), 0);
        }

        #[test]
        fn prop_second_add_is_duplicate(suffix in "[0-9]{1,15}") {
            let ctx = context();
            let supi = format!("imsi-{suffix}");
            ctx.ue_add(&supi).unwrap();
            prop_assert_eq!(
                ctx.ue_add(&supi).unwrap_err(),
                ChfError::DuplicateSubscriber(supi.clone())
            );
            prop_assert_eq!(ctx.ue_pool().count(), 1);
        }

        #[test]
        fn prop_version_token_is_major(major in 0u32..1000, rest in "(\\.[0-9]{1,3}){0,3}") {
            let version = format!("{major}{rest}");
            prop_assert_eq!(api_version_in_uri(&version).unwrap(), format!("v{major}"));
        }

        #[test]
        fn prop_instance_ids_follow_position(n in 1usize..8) {
            let ctx = context();
            let list: Vec<ServiceConf> =
                (0..n).map(|i| ServiceConf::new(format!("nchf-service-{i}"))).collect();
            ctx.init_nf_service(&list, "1.0.3").unwrap();

            let services = ctx.nf_services().snapshot();
            prop_assert_eq!(services.len(), n);
            for (i, conf) in list.iter().enumerate() {
                prop_assert_eq!(
                    &services[&conf.service_name].service_instance_id,
                    &i.to_string()
                );
            }
        }

        #[test]
        fn prop_sequence_strictly_increasing(count in 1usize..200) {
            let ctx = context();
            let values: Vec<u64> = (0..count).map(|_| ctx.allocate_sequence_number()).collect();
            prop_assert!(values.windows(2).all(|w| w[0] < w[1]));
        }
    }
}
