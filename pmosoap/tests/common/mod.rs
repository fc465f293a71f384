//! Fixtures partagées par les tests d'intégration

#![allow(dead_code)]

pub const NAMESPACE: &str = "http://tempuri.org/";

pub const USER_WSDL: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<wsdl:definitions xmlns:s="http://www.w3.org/2001/XMLSchema"
                  xmlns:wsdl="http://schemas.xmlsoap.org/wsdl/"
                  xmlns:tns="http://tempuri.org/"
                  targetNamespace="http://tempuri.org/">
  <wsdl:types>
    <s:schema elementFormDefault="qualified" targetNamespace="http://tempuri.org/">
      <s:element name="GetUser">
        <s:complexType>
          <s:sequence>
            <s:element minOccurs="1" maxOccurs="1" name="UserId" type="s:int" />
          </s:sequence>
        </s:complexType>
      </s:element>
      <s:element name="GetUserResponse">
        <s:complexType>
          <s:sequence>
            <s:element minOccurs="0" maxOccurs="1" name="GetUserResult" type="tns:User" />
          </s:sequence>
        </s:complexType>
      </s:element>
      <s:complexType name="User">
        <s:sequence>
          <s:element minOccurs="0" maxOccurs="1" name="Name" type="s:string" />
          <s:element minOccurs="1" maxOccurs="1" name="Age" type="s:int" />
          <s:element minOccurs="1" maxOccurs="1" name="Birthday" type="s:dateTime" />
          <s:element minOccurs="0" maxOccurs="1" name="Tags" type="tns:ArrayOfString" />
        </s:sequence>
      </s:complexType>
      <s:complexType name="ArrayOfString">
        <s:sequence>
          <s:element minOccurs="0" maxOccurs="unbounded" name="string" type="s:string" />
        </s:sequence>
      </s:complexType>
      <s:element name="return" type="s:int" />
    </s:schema>
  </wsdl:types>
</wsdl:definitions>"#;

pub const USER_RESPONSE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/">
  <soap:Body>
    <GetUserResponse xmlns="http://tempuri.org/">
      <GetUserResult>
        <Name>Ada</Name>
        <Age>36</Age>
        <Birthday>1815-12-10T00:00:00+00:00</Birthday>
        <Tags>
          <string>math</string>
          <string>poetry</string>
        </Tags>
      </GetUserResult>
    </GetUserResponse>
  </soap:Body>
</soap:Envelope>"#;

pub const RETURN_RESPONSE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/">
  <soap:Body>
    <ns1:GetUserResponse xmlns:ns1="http://tempuri.org/">
      <return>42</return>
    </ns1:GetUserResponse>
  </soap:Body>
</soap:Envelope>"#;

pub const FAULT_RESPONSE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/">
  <soap:Body>
    <soap:Fault>
      <faultcode>Server</faultcode>
      <faultstring>Boom</faultstring>
    </soap:Fault>
  </soap:Body>
</soap:Envelope>"#;

pub const NO_NAMESPACE_WSDL: &str = r#"<definitions xmlns="http://schemas.xmlsoap.org/wsdl/"/>"#;

pub const ECHO_WSDL: &str = r#"<definitions xmlns:xsd="http://www.w3.org/2001/XMLSchema" targetNamespace="urn:echo">
  <types>
    <xsd:schema>
      <xsd:element name="EchoResult" type="xsd:string"/>
    </xsd:schema>
  </types>
</definitions>"#;

pub const ECHO_RESPONSE: &str = r#"<Envelope><Body><EchoResponse><EchoResult>hello</EchoResult></EchoResponse></Body></Envelope>"#;
