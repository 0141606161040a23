//! Descriptor set of `proto/payment.proto` for server reflection.
//!
//! Built by hand alongside the messages in [`crate::proto`], so tools such
//! as grpcurl can discover the service without a local copy of the file.

use prost_types::field_descriptor_proto::{Label, Type};
use prost_types::{
    DescriptorProto, FieldDescriptorProto, FileDescriptorProto, FileDescriptorSet,
    MethodDescriptorProto, ServiceDescriptorProto,
};

/// Name the file is registered under.
pub const FILE_NAME: &str = "payment.proto";

const PACKAGE: &str = "payment";
const SERVICE: &str = "PaymentService";

fn field(name: &str, number: i32, kind: Type) -> FieldDescriptorProto {
    FieldDescriptorProto {
        name: Some(name.to_owned()),
        number: Some(number),
        label: Some(Label::Optional as i32),
        r#type: Some(kind as i32),
        json_name: Some(name.to_owned()),
        ..Default::default()
    }
}

fn repeated_message(name: &str, number: i32, message: &str) -> FieldDescriptorProto {
    FieldDescriptorProto {
        label: Some(Label::Repeated as i32),
        type_name: Some(format!(".{PACKAGE}.{message}")),
        ..field(name, number, Type::Message)
    }
}

fn message(name: &str, fields: Vec<FieldDescriptorProto>) -> DescriptorProto {
    DescriptorProto {
        name: Some(name.to_owned()),
        field: fields,
        ..Default::default()
    }
}

fn method(name: &str, input: &str, output: &str) -> MethodDescriptorProto {
    MethodDescriptorProto {
        name: Some(name.to_owned()),
        input_type: Some(format!(".{PACKAGE}.{input}")),
        output_type: Some(format!(".{PACKAGE}.{output}")),
        ..Default::default()
    }
}

/// The `payment` package: its messages and `PaymentService`.
#[must_use]
pub fn file_descriptor_set() -> FileDescriptorSet {
    let messages = vec![
        message("CreatePaymentRequest", vec![field("amount", 1, Type::Double)]),
        message(
            "PaymentResponse",
            vec![field("id", 1, Type::String), field("amount", 2, Type::Double)],
        ),
        message("GetAllPaymentsRequest", Vec::new()),
        message(
            "GetAllPaymentsResponse",
            vec![repeated_message("payments", 1, "PaymentResponse")],
        ),
        message("GetPaymentByIDRequest", vec![field("id", 1, Type::String)]),
        message("DeletePaymentRequest", vec![field("id", 1, Type::String)]),
        message("DeletePaymentResponse", vec![field("message", 1, Type::String)]),
    ];

    let service = ServiceDescriptorProto {
        name: Some(SERVICE.to_owned()),
        method: vec![
            method("CreatePayment", "CreatePaymentRequest", "PaymentResponse"),
            method("GetAllPayments", "GetAllPaymentsRequest", "GetAllPaymentsResponse"),
            method("GetPaymentByID", "GetPaymentByIDRequest", "PaymentResponse"),
            method("DeletePayment", "DeletePaymentRequest", "DeletePaymentResponse"),
        ],
        ..Default::default()
    };

    FileDescriptorSet {
        file: vec![FileDescriptorProto {
            name: Some(FILE_NAME.to_owned()),
            package: Some(PACKAGE.to_owned()),
            message_type: messages,
            service: vec![service],
            syntax: Some("proto3".to_owned()),
            ..Default::default()
        }],
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::proto::{SERVICE_NAME, paths};

    #[test]
    fn test_methods_match_dispatch_paths() {
        let set = file_descriptor_set();
        let file = &set.file[0];
        let service = &file.service[0];
        assert_eq!(
            format!("{}.{}", file.package(), service.name()),
            SERVICE_NAME
        );

        let routes: Vec<String> = service
            .method
            .iter()
            .map(|m| format!("/{SERVICE_NAME}/{}", m.name()))
            .collect();
        assert_eq!(
            routes,
            [
                paths::CREATE_PAYMENT,
                paths::GET_ALL_PAYMENTS,
                paths::GET_PAYMENT_BY_ID,
                paths::DELETE_PAYMENT,
            ]
        );
    }

    #[test]
    fn test_method_types_are_declared_messages() {
        let set = file_descriptor_set();
        let file = &set.file[0];
        let declared: Vec<String> = file
            .message_type
            .iter()
            .map(|m| format!(".{PACKAGE}.{}", m.name()))
            .collect();

        for method in &file.service[0].method {
            assert!(declared.iter().any(|d| d == method.input_type()), "{method:?}");
            assert!(declared.iter().any(|d| d == method.output_type()), "{method:?}");
        }
    }

    #[test]
    fn test_field_numbers_match_messages() {
        let set = file_descriptor_set();
        let response = set.file[0]
            .message_type
            .iter()
            .find(|m| m.name() == "PaymentResponse")
            .unwrap();
        let fields: Vec<(&str, i32, Type)> = response
            .field
            .iter()
            .map(|f| (f.name(), f.number(), f.r#type()))
            .collect();
        assert_eq!(
            fields,
            [("id", 1, Type::String), ("amount", 2, Type::Double)]
        );
    }
}
